use crate::error::ProtocolError;
use crate::model::session::{SdpType, SessionDescription};
use serde::Serialize;
use serde_json::Value;

/// Negotiation message exchanged through the relay.
///
/// On the wire this is a flat JSON object: `{"type": "offer", "sdp": "..."}`.
/// Encoding goes through serde; decoding only through [`SignalMessage::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    Offer { sdp: String },
    Answer { sdp: String },
}

impl SignalMessage {
    pub fn kind(&self) -> SdpType {
        match self {
            Self::Offer { .. } => SdpType::Offer,
            Self::Answer { .. } => SdpType::Answer,
        }
    }

    pub fn sdp(&self) -> &str {
        match self {
            Self::Offer { sdp } | Self::Answer { sdp } => sdp,
        }
    }

    pub fn into_description(self) -> SessionDescription {
        match self {
            Self::Offer { sdp } => SessionDescription::new(SdpType::Offer, sdp),
            Self::Answer { sdp } => SessionDescription::new(SdpType::Answer, sdp),
        }
    }

    /// Decodes a text frame, reporting exactly which part of the record is
    /// missing or wrong.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(fields) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let kind = match fields.get("type") {
            None => return Err(ProtocolError::MissingField("type")),
            Some(Value::String(kind)) => kind.as_str(),
            Some(_) => return Err(ProtocolError::InvalidField("type")),
        };
        let kind = match kind {
            "offer" => SdpType::Offer,
            "answer" => SdpType::Answer,
            other => return Err(ProtocolError::UnknownType(other.to_owned())),
        };

        let sdp = match fields.get("sdp") {
            None => return Err(ProtocolError::MissingField("sdp")),
            Some(Value::String(sdp)) => sdp.clone(),
            Some(_) => return Err(ProtocolError::InvalidField("sdp")),
        };

        Ok(SessionDescription::new(kind, sdp).into_message())
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<SessionDescription> for SignalMessage {
    fn from(desc: SessionDescription) -> Self {
        desc.into_message()
    }
}
