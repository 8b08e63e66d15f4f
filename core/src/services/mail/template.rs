//! Verification email template.
//!
//! The body is bilingual: a Persian (right-to-left) section followed by the
//! same text in English.

use chrono::{DateTime, Utc};

use super::transport::MailMessage;

pub const VERIFICATION_SUBJECT: &str = "Verify your email - Sefr";

/// Everything needed to render a verification email
#[derive(Debug, Clone)]
pub struct VerificationEmail<'a> {
    pub to: &'a str,
    pub username: &'a str,
    pub code: &'a str,
    pub expires_at: DateTime<Utc>,
}

impl<'a> VerificationEmail<'a> {
    /// Expiry as a wall clock time, `HH:MM` UTC
    pub fn expiry_clock(&self) -> String {
        self.expires_at.format("%H:%M").to_string()
    }

    pub fn render(&self) -> MailMessage {
        MailMessage {
            to: self.to.to_string(),
            subject: VERIFICATION_SUBJECT.to_string(),
            text_body: self.text_body(),
            html_body: self.html_body(),
        }
    }

    fn text_body(&self) -> String {
        let expiry = self.expiry_clock();
        format!(
            "سلام {user}،\n\
             کد تایید ایمیل شما: {code}\n\
             این کد تا ساعت {expiry} (UTC) معتبر است.\n\
             \n\
             Hello {user},\n\
             Your email verification code is: {code}\n\
             The code is valid until {expiry} UTC.\n\
             \n\
             If you did not create a Sefr account, you can ignore this email.\n",
            user = self.username,
            code = self.code,
            expiry = expiry,
        )
    }

    fn html_body(&self) -> String {
        let user = escape_html(self.username);
        let code = escape_html(self.code);
        let expiry = self.expiry_clock();
        format!(
            r#"<!DOCTYPE html>
<html lang="fa" dir="rtl">
<head><meta charset="UTF-8"><title>{subject}</title></head>
<body style="font-family: Vazirmatn, Tahoma, Arial, sans-serif; background-color: #f9fafb; color: #111827;">
  <div style="max-width: 600px; margin: 20px auto; background-color: #ffffff; border-radius: 8px; padding: 25px;">
    <h1 style="font-size: 18px;">سلام {user}</h1>
    <p>کد تایید ایمیل شما:</p>
    <p style="font-size: 28px; font-weight: 700; letter-spacing: 6px; direction: ltr; text-align: center;">{code}</p>
    <p>این کد تا ساعت {expiry} (UTC) معتبر است.</p>
    <hr>
    <div dir="ltr" style="text-align: left;">
      <p>Hello {user},</p>
      <p>Your email verification code is <strong>{code}</strong>. It is valid until {expiry} UTC.</p>
      <p style="color: #6b7280;">If you did not create a Sefr account, you can ignore this email.</p>
    </div>
  </div>
</body>
</html>"#,
            subject = VERIFICATION_SUBJECT,
            user = user,
            code = code,
            expiry = expiry,
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn email(username: &'static str) -> VerificationEmail<'static> {
        VerificationEmail {
            to: "reader@example.com",
            username,
            code: "042917",
            expires_at: Utc.with_ymd_and_hms(2024, 5, 20, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_contains_code_and_expiry() {
        let message = email("reader").render();

        assert_eq!(message.to, "reader@example.com");
        assert_eq!(message.subject, "Verify your email - Sefr");
        assert!(message.text_body.contains("042917"));
        assert!(message.text_body.contains("10:30"));
        assert!(message.text_body.contains("Hello reader"));
        assert!(message.html_body.contains("042917"));
        assert!(message.html_body.contains("10:30"));
    }

    #[test]
    fn test_html_escapes_username() {
        let message = email("<b>bold</b>").render();
        assert!(message.html_body.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!message.html_body.contains("<b>bold</b>"));
    }
}
