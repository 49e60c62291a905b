/// A fully rendered release notification, ready to hand to a mailer.
#[derive(Debug, Clone)]
pub struct ReleaseEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}
