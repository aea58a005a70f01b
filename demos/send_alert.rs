use anyhow::Result;
use clap::Parser;
use sendgrid_integration::{
    domain::communication::integration::{
        EmailIntegration, SendEmailRequest, SendTemplatedEmailRequest,
    },
    infrastructure::email::{IntegrationSettings, SendGridIntegration},
};
use tracing::info;

/// Sends one email with the configured SendGrid integration
#[derive(Debug, Parser)]
pub struct Args {
    #[clap(flatten)]
    pub settings: IntegrationSettings,

    /// Subject for this email
    #[arg(long)]
    pub subject: Option<String>,

    /// Body appended to the default message
    #[arg(long)]
    pub message: Option<String>,

    /// Send a templated email with this template id
    #[arg(long)]
    pub template_id: Option<String>,

    /// Extra receivers
    #[arg(long = "to")]
    pub receivers: Vec<String>,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let integration = SendGridIntegration::from_settings(&args.settings)?;

    match args.template_id {
        Some(template_id) => {
            let mut request = SendTemplatedEmailRequest::new()
                .template_id(template_id)
                .receivers(args.receivers);

            request.subject = args.subject;

            integration.send_templated_email(request).await?;
        }
        None => {
            let request = SendEmailRequest {
                subject: args.subject,
                message: args.message,
                receivers: args.receivers,
            };

            integration.send_email(request).await?;
        }
    }

    info!("email sent");

    Ok(())
}
