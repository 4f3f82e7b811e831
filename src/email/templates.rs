use askama::Template;

use crate::models::Submission;

#[derive(Template)]
#[template(path = "email/contact_notification.html")]
struct ContactNotification<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    id: String,
}

pub fn contact_subject(submission: &Submission) -> String {
    format!("New portfolio contact from {}", submission.name)
}

pub fn render_contact_notification(submission: &Submission) -> Result<String, askama::Error> {
    ContactNotification {
        name: &submission.name,
        email: &submission.email,
        message: &submission.message,
        id: submission.id.to_string(),
    }
    .render()
}
