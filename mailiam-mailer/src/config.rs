use crate::transports::TlsConfig;
use crate::{FileTransport, Mailer, MailerError, SendmailTransport, SmtpTransport, TemplateContext};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration of the default transport, i.e. the one mail falls back to
/// when it is not sent through the Mailiam API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub transport: TransportConfig,
    pub from_address: String,
    pub from_name: Option<String>,
    pub site_name: String,
    pub site_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    Smtp {
        host: String,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
        tls: Option<TlsType>,
        timeout_secs: Option<u64>,
    },
    File {
        output_dir: PathBuf,
    },
    Sendmail {
        command: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsType {
    None,
    StartTls,
    Tls,
}

impl From<TlsType> for TlsConfig {
    fn from(tls_type: TlsType) -> Self {
        match tls_type {
            TlsType::None => TlsConfig::None,
            TlsType::StartTls => TlsConfig::StartTls,
            TlsType::Tls => TlsConfig::Tls,
        }
    }
}

impl TlsType {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "none" => Some(TlsType::None),
            "starttls" => Some(TlsType::StartTls),
            "tls" => Some(TlsType::Tls),
            _ => None,
        }
    }
}

impl MailerConfig {
    pub fn from_env() -> Result<Self, MailerError> {
        let transport = if let Ok(smtp_host) = std::env::var("MAILER_SMTP_HOST") {
            TransportConfig::Smtp {
                host: smtp_host,
                port: parse_env("MAILER_SMTP_PORT")?,
                username: std::env::var("MAILER_SMTP_USERNAME").ok(),
                password: std::env::var("MAILER_SMTP_PASSWORD").ok(),
                tls: std::env::var("MAILER_SMTP_TLS")
                    .ok()
                    .and_then(|t| TlsType::parse(&t)),
                timeout_secs: parse_env("MAILER_SMTP_TIMEOUT_SECS")?,
            }
        } else if let Ok(output_dir) = std::env::var("MAILER_FILE_OUTPUT_DIR") {
            TransportConfig::File {
                output_dir: PathBuf::from(output_dir),
            }
        } else if std::env::var("MAILER_SENDMAIL").is_ok() {
            TransportConfig::Sendmail {
                command: std::env::var("MAILER_SENDMAIL_COMMAND").ok(),
            }
        } else {
            // Development default
            TransportConfig::File {
                output_dir: PathBuf::from("./emails"),
            }
        };

        let defaults = Self::default();
        Ok(Self {
            transport,
            from_address: std::env::var("MAILER_FROM_ADDRESS").unwrap_or(defaults.from_address),
            from_name: std::env::var("MAILER_FROM_NAME").ok(),
            site_name: std::env::var("MAILER_SITE_NAME").unwrap_or(defaults.site_name),
            site_url: std::env::var("MAILER_SITE_URL").unwrap_or(defaults.site_url),
        })
    }

    /// Builds the configured transport. SMTP transports need a running tokio
    /// runtime.
    pub fn build_transport(&self) -> Result<Box<dyn Mailer>, MailerError> {
        match &self.transport {
            TransportConfig::Smtp {
                host,
                port,
                username,
                password,
                tls,
                timeout_secs,
            } => {
                let mut builder = SmtpTransport::builder(host);

                if let Some(port) = port {
                    builder = builder.port(*port);
                }

                if let (Some(username), Some(password)) = (username, password) {
                    builder = builder.credentials(username, password);
                }

                if let Some(tls) = tls {
                    builder = builder.tls((*tls).into());
                }

                if let Some(secs) = timeout_secs {
                    builder = builder.timeout(Duration::from_secs(*secs));
                }

                Ok(Box::new(builder.build()?))
            }
            TransportConfig::File { output_dir } => Ok(Box::new(FileTransport::new(output_dir)?)),
            TransportConfig::Sendmail { command } => match command {
                Some(command) => Ok(Box::new(SendmailTransport::with_command(command))),
                None => Ok(Box::new(SendmailTransport::new())),
            },
        }
    }

    pub fn get_from_address(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_address),
            None => self.from_address.clone(),
        }
    }

    pub fn template_context(&self) -> TemplateContext {
        TemplateContext {
            site_name: self.site_name.clone(),
            site_url: self.site_url.clone(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, MailerError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| MailerError::Config(format!("{name} has an invalid value: {value}"))),
        Err(_) => Ok(None),
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::File {
                output_dir: PathBuf::from("./emails"),
            },
            from_address: "wordpress@example.com".to_string(),
            from_name: None,
            site_name: "Your Site".to_string(),
            site_url: "https://example.com".to_string(),
        }
    }
}
