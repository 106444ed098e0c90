//! Support ticket intake through the `raise-support-ticket` edge function

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use hasad_functions::{FunctionsClient, FunctionsError};

use crate::auth::UserId;
use crate::farm::ParseEnumError;
use crate::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
}

impl FromStr for ContactMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ContactMethod::Email),
            "phone" => Ok(ContactMethod::Phone),
            other => Err(ParseEnumError::new("contact method", other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TicketRequest<'a> {
    contact_id: i64,
    issue: &'a str,
    contact_method: ContactMethod,
    user_id: &'a UserId,
}

/// Body returned for an accepted ticket
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TicketReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum SupportError {
    #[error("contact and issue are required")]
    Incomplete,

    #[error("support ticket was not accepted: {0}")]
    Submission(#[source] FunctionsError),
}

impl SupportError {
    pub fn message_key(&self) -> &'static str {
        match self {
            SupportError::Incomplete => "pleaseCompleteAllFields",
            SupportError::Submission(_) => "supportTicketError",
        }
    }

    pub fn localized(&self, translator: &dyn Translator) -> String {
        translator.translate(self.message_key())
    }
}

pub struct SupportDesk {
    functions: FunctionsClient,
    function_name: String,
    user_id: UserId,
    translator: Arc<dyn Translator>,
}

impl SupportDesk {
    pub fn new(
        functions: FunctionsClient,
        function_name: &str,
        user_id: UserId,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            functions,
            function_name: function_name.to_string(),
            user_id,
            translator,
        }
    }

    /// Raises a ticket about `issue` for the chosen contact.
    ///
    /// Backend messages are logged; callers only get the localized text from
    /// [`SupportError::localized`].
    pub async fn raise_ticket(
        &self,
        contact_id: Option<i64>,
        issue: &str,
        contact_method: ContactMethod,
    ) -> Result<TicketReceipt, SupportError> {
        let contact_id = match contact_id {
            Some(id) if !issue.trim().is_empty() => id,
            _ => return Err(SupportError::Incomplete),
        };

        let request = TicketRequest {
            contact_id,
            issue,
            contact_method,
            user_id: &self.user_id,
        };

        match self
            .functions
            .invoke::<TicketReceipt, _>(&self.function_name, Some(request), None)
            .await
        {
            Ok(response) => {
                info!(
                    "support ticket {} raised for contact {}",
                    response.data.ticket_id.as_deref().unwrap_or("-"),
                    contact_id
                );
                Ok(response.data)
            }
            Err(err) => {
                error!("support ticket error: {}", err);
                Err(SupportError::Submission(err))
            }
        }
    }

    /// Localized confirmation shown after a ticket is accepted
    pub fn success_message(&self) -> String {
        self.translator.translate("ticketSubmittedSuccessfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_contact_method() {
        assert_eq!("email".parse::<ContactMethod>(), Ok(ContactMethod::Email));
        assert_eq!("phone".parse::<ContactMethod>(), Ok(ContactMethod::Phone));

        let err = "fax".parse::<ContactMethod>().unwrap_err();
        assert_eq!(err.to_string(), "unknown contact method: fax");
    }
}
