//! Transactional email templates.

use crate::delivery::email::{Attachment, OutgoingEmail};

/// Minimal HTML escaping for values interpolated into email bodies.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Password-reset code email.
pub fn otp_email(to: &str, full_name: &str, code: &str, expiry_mins: i64) -> OutgoingEmail {
    let text_body = format!(
        "Hi {full_name},\n\n\
         Your password reset code is {code}. It expires in {expiry_mins} minutes.\n\n\
         If you did not request a reset you can ignore this email."
    );
    let html_body = format!(
        "<p>Hi {},</p>\
         <p>Your password reset code is <strong style=\"font-size:20px;letter-spacing:4px\">{code}</strong>.</p>\
         <p>It expires in {expiry_mins} minutes.</p>\
         <p>If you did not request a reset you can ignore this email.</p>",
        escape_html(full_name)
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: "Your password reset code".to_string(),
        text_body,
        html_body: Some(html_body),
        attachments: Vec::new(),
    }
}

/// Proposal delivery email with the rendered PDF attached.
pub fn proposal_email(
    to: &str,
    client_name: &str,
    reference_code: &str,
    title: &str,
    public_url: &str,
    pdf: Vec<u8>,
) -> OutgoingEmail {
    let text_body = format!(
        "Dear {client_name},\n\n\
         Please find attached your wedding proposal \"{title}\" ({reference_code}).\n\
         You can also view it online: {public_url}\n\n\
         We look forward to planning your day."
    );
    let html_body = format!(
        "<p>Dear {},</p>\
         <p>Please find attached your wedding proposal <strong>{}</strong> ({reference_code}).</p>\
         <p><a href=\"{}\">View it online</a></p>\
         <p>We look forward to planning your day.</p>",
        escape_html(client_name),
        escape_html(title),
        escape_html(public_url),
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Your wedding proposal {reference_code}"),
        text_body,
        html_body: Some(html_body),
        attachments: vec![Attachment::pdf(format!("{reference_code}.pdf"), pdf)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_email_carries_code_and_expiry() {
        let email = otp_email("a@example.com", "Asha", "042917", 10);
        assert!(email.text_body.contains("042917"));
        assert!(email.text_body.contains("10 minutes"));
        assert!(email.attachments.is_empty());
    }

    #[test]
    fn proposal_email_attaches_named_pdf() {
        let email = proposal_email(
            "a@example.com",
            "Asha <& Rohan>",
            "PRP-20261016-0001",
            "Beach wedding",
            "https://app.example.com/proposals/PRP-20261016-0001",
            vec![1, 2, 3],
        );
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(email.attachments[0].filename, "PRP-20261016-0001.pdf");
        assert_eq!(email.attachments[0].content_type, "application/pdf");
        let html = email.html_body.unwrap();
        assert!(html.contains("Asha &lt;&amp; Rohan&gt;"));
        assert!(!html.contains("<& Rohan>"));
    }
}
