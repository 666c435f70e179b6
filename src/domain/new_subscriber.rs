use super::SubscriberEmail;

/// Wire shape of a subscription request.
#[derive(serde::Deserialize, Debug)]
pub struct SubscribeBody {
    pub email: String,
}

/// A subscription request that passed validation and may be persisted.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email)?;
        Ok(Self { email })
    }
}
