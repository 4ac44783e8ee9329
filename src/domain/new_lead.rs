/// A lead captured by the landing page form.
///
/// Neither field is checked for format: the CRM is the authority on what it accepts.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub email: String,
    pub phone: String,
}

impl NewLead {
    pub fn parse(email: Option<String>, phone: Option<String>) -> Result<Self, String> {
        match (non_empty(email), non_empty(phone)) {
            (Some(email), Some(phone)) => Ok(Self { email, phone }),
            _ => Err("Email and phone are required".into()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
