//! Plain-text e-mail bodies rendered with Handlebars

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::DomainError;

pub const RESET_CODE: &str = "reset_code";
pub const CHANGE_CODE: &str = "change_code";
pub const ORDER_CONFIRMATION: &str = "order_confirmation";
pub const SUPPORT_REQUEST: &str = "support_request";

const RESET_CODE_BODY: &str = "Hello!

A password reset was requested for your Shoes Store account.

Your confirmation code: {{code}}

The code is valid for {{ttl_minutes}} minutes.
If you did not request a password reset, ignore this message.

Shoes Store Team
";

const CHANGE_CODE_BODY: &str = "Hello!

A password change was requested for your Shoes Store account.

Your confirmation code: {{code}}

The code is valid for {{ttl_minutes}} minutes.
If you did not request a password change, ignore this message.

Shoes Store Team
";

const ORDER_CONFIRMATION_BODY: &str = "Hello!

Your order #{{order_id}} has been placed.

Order date: {{order_date}}

Order details:
{{#each lines}}
{{number}}. {{product_name}}
   Size: {{size}}
   Unit price: {{price}}
   Quantity: {{quantity}}
   Subtotal: {{total}}
{{/each}}

TOTAL: {{total}}

Thank you for shopping with Shoes Store!
";

const SUPPORT_REQUEST_BODY: &str = "New support request

Name: {{name}}
Email: {{email}}
Received: {{received_at}}

Message:
{{message}}
";

/// Registry of the mail templates. Output is plain text, so escaping is off.
pub struct MailTemplates {
    registry: Handlebars<'static>,
}

impl MailTemplates {
    pub fn new() -> Result<Self, DomainError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        for (name, body) in [
            (RESET_CODE, RESET_CODE_BODY),
            (CHANGE_CODE, CHANGE_CODE_BODY),
            (ORDER_CONFIRMATION, ORDER_CONFIRMATION_BODY),
            (SUPPORT_REQUEST, SUPPORT_REQUEST_BODY),
        ] {
            registry
                .register_template_string(name, body)
                .map_err(|e| DomainError::RenderError(e.to_string()))?;
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, DomainError> {
        self.registry
            .render(name, data)
            .map_err(|e| DomainError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reset_code_body() {
        let templates = MailTemplates::new().unwrap();
        let body = templates
            .render(RESET_CODE, &json!({ "code": "123456", "ttl_minutes": 10 }))
            .unwrap();
        assert!(body.contains("Your confirmation code: 123456"));
        assert!(body.contains("valid for 10 minutes"));
    }

    #[test]
    fn test_support_body_is_not_escaped() {
        let templates = MailTemplates::new().unwrap();
        let body = templates
            .render(
                SUPPORT_REQUEST,
                &json!({ "name": "Ann", "email": "a@b.com", "received_at": "now", "message": "<b>&</b>" }),
            )
            .unwrap();
        assert!(body.contains("<b>&</b>"));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let templates = MailTemplates::new().unwrap();
        assert!(templates.render(RESET_CODE, &json!({ "code": "1" })).is_err());
    }
}
