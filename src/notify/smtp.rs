use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::{ShopIdentity, SmtpConfig};

use super::{Notification, Notifier, NotifyError};

/// Sends notices through an SMTP relay over implicit TLS. Rendering
/// happens here so the shop identity travels with the transport.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    shop: ShopIdentity,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig, shop: ShopIdentity) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = format!("{} <{}>", shop.name, config.username)
            .parse()
            .map_err(|err: lettre::address::AddressError| NotifyError::Recipient(err.to_string()))?;
        Ok(Self {
            transport,
            from,
            shop,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|err: lettre::address::AddressError| NotifyError::Recipient(err.to_string()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(notification.subject(&self.shop))
            .header(ContentType::TEXT_HTML)
            .body(notification.html_body(&self.shop))
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        info!(recipient = %to, kind = notification.kind(), "notification email sent");
        Ok(())
    }
}
