use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mailadmin_client::{ApiClient, ApiError, ClientConfig, Services, SyncGate, SyncOutcome};
use mailadmin_shared::api::{
    CodeRequest, GetMessagesParams, ResourceQuery, SortOrder, UpdateAllowedDomainsRequest,
    UpdateLabelsRequest, UpdateMessageLabelRequest,
};
use mailadmin_shared::dynamic_data::DynamicDataParams;
use mailadmin_shared::models::{LabelMapping, Message, SystemLabel};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "mailadmin")]
#[command(about = "Administer the mail pipeline of the academic assistant backend")]
#[command(
    long_about = "A command-line interface to the email admin API.\n\n\
    Triggers Gmail syncs, browses and relabels ingested messages, edits the\n\
    system label mapping and allowed sender domains, and connects the mailbox."
)]
struct Cli {
    /// Backend server URL to connect to.
    #[arg(
        short,
        long,
        default_value = "http://localhost:3000",
        env = "API_BASE_URL"
    )]
    base_url: String,

    /// Bearer token sent with authenticated requests.
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 30_000, env = "API_TIMEOUT_MS")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the backend to pull new mail from Gmail
    Sync,
    /// Browse ingested messages and edit their system labels
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },
    /// Manage the mapping from system labels to Gmail labels
    Labels {
        #[command(subcommand)]
        action: LabelAction,
    },
    /// Manage the sender domains mail is accepted from
    Domains {
        #[command(subcommand)]
        action: DomainAction,
    },
    /// Connect the mailbox through Google OAuth
    Grants {
        #[command(subcommand)]
        action: GrantAction,
    },
    /// Fetch settings and enums from the dynamic-data endpoint
    DynamicData {
        /// Setting key to fetch (e.g. email.superEmail). Repeatable.
        #[arg(long = "setting", value_name = "KEY")]
        settings: Vec<String>,

        /// Enum path to fetch (e.g. shared.systemLabel). Repeatable.
        #[arg(long = "enum", value_name = "PATH")]
        enums: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MessageAction {
    /// List one page of messages
    List {
        /// Only messages carrying this system label. Repeatable.
        #[arg(short, long = "label", value_name = "LABEL")]
        labels: Vec<SystemLabel>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short = 'n', long, default_value_t = 10)]
        limit: u32,

        /// Field to sort by (e.g. sentAt).
        #[arg(long, value_name = "FIELD")]
        sort_by: Option<String>,

        #[arg(long, value_enum)]
        sort_order: Option<SortArg>,
    },

    /// Show one message
    Get { id: i64 },

    /// Add a system label to a message, or remove it with --remove
    Label {
        id: i64,

        /// classRegistration, task, inquiry or other
        label: SystemLabel,

        #[arg(long)]
        remove: bool,
    },
}

#[derive(Subcommand)]
enum LabelAction {
    /// List the labels of the connected Gmail account
    Gmail,
    /// Show the current system label mapping
    Show,
    /// Create missing Gmail labels and map them
    AutoCreate,
    /// Change part of the mapping; labels not named are left as they are
    Set {
        #[arg(long, value_name = "GMAIL_LABEL_ID")]
        class_registration: Option<String>,

        #[arg(long, value_name = "GMAIL_LABEL_ID")]
        task: Option<String>,

        #[arg(long, value_name = "GMAIL_LABEL_ID")]
        inquiry: Option<String>,

        #[arg(long, value_name = "GMAIL_LABEL_ID")]
        other: Option<String>,

        /// Remove the mapping of this system label. Repeatable.
        #[arg(long, value_name = "LABEL")]
        clear: Vec<SystemLabel>,
    },
}

#[derive(Subcommand)]
enum DomainAction {
    /// List allowed sender domains
    Show,
    /// Replace the whole list of allowed sender domains
    Set {
        #[arg(required = true)]
        domains: Vec<String>,
    },
}

#[derive(Subcommand)]
enum GrantAction {
    /// Print the Google consent URL to open in a browser
    Url,
    /// Exchange the authorization code from the redirect
    Exchange { code: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailadmin=info,mailadmin_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = ClientConfig::new(&cli.base_url)
        .context("Invalid --base-url")?
        .with_timeout(Duration::from_millis(cli.timeout_ms))
        .with_token(cli.token.filter(|token| !token.is_empty()));
    let services = Services::new(ApiClient::native(config));

    let result = match cli.command {
        Commands::Sync => handle_sync(&services).await,
        Commands::Messages { action } => handle_messages(&services, action).await,
        Commands::Labels { action } => handle_labels(&services, action).await,
        Commands::Domains { action } => handle_domains(&services, action).await,
        Commands::Grants { action } => handle_grants(&services, action).await,
        Commands::DynamicData { settings, enums } => {
            handle_dynamic_data(&services, settings, enums).await
        }
    };

    if let Err(err) = &result {
        for line in field_error_lines(err) {
            eprintln!("{}", line);
        }
    }
    result
}

/// Per-field validation messages carried by an API error, one line each.
fn field_error_lines(err: &anyhow::Error) -> Vec<String> {
    err.downcast_ref::<ApiError>()
        .and_then(|api| api.errors.as_ref())
        .map(|errors| {
            errors
                .iter()
                .map(|field| format!("  {}: {}", field.field, field.message.join(", ")))
                .collect()
        })
        .unwrap_or_default()
}

async fn handle_dynamic_data(
    services: &Services,
    settings: Vec<String>,
    enums: Vec<String>,
) -> anyhow::Result<()> {
    let data = services
        .dynamic_data
        .get(&DynamicDataParams { settings, enums })
        .await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

async fn handle_sync(services: &Services) -> anyhow::Result<()> {
    match SyncGate::new().trigger(&services.messages).await {
        SyncOutcome::Started => println!("Sync started."),
        SyncOutcome::AlreadyRunning => println!("A sync is already running."),
        SyncOutcome::Failed(err) => return Err(err).context("Failed to start sync"),
    }
    Ok(())
}

async fn handle_messages(services: &Services, action: MessageAction) -> anyhow::Result<()> {
    match action {
        MessageAction::List {
            labels,
            page,
            limit,
            sort_by,
            sort_order,
        } => {
            let params = GetMessagesParams {
                query: ResourceQuery {
                    page: Some(page),
                    limit: Some(limit),
                    sort_by,
                    sort_order: sort_order.map(SortOrder::from),
                },
                system_labels: labels,
            };
            let result = services.messages.get_messages(&params).await?;
            if result.items.is_empty() {
                println!("No messages found.");
            } else {
                for message in &result.items {
                    print_message_line(message);
                }
            }
            println!(
                "Page {} of {} ({} messages)",
                result.page, result.total_pages, result.total
            );
        }
        MessageAction::Get { id } => {
            let message = services.messages.get_message_by_id(id).await?;
            print_message_line(&message);
            println!("    From: {} <{}>", message.sender_name, message.sender_email);
            println!("    Thread: {}", message.thread_id);
            println!("    Gmail labels: {}", message.label_ids.join(", "));
        }
        MessageAction::Label { id, label, remove } => {
            let request = UpdateMessageLabelRequest {
                message_id: id,
                system_label: label,
                is_remove: remove,
            };
            services.message_labels.update_message_label(&request).await?;
            if remove {
                println!("Removed {} from message {}", label, id);
            } else {
                println!("Added {} to message {}", label, id);
            }
        }
    }
    Ok(())
}

fn print_message_line(message: &Message) {
    let labels: Vec<&str> = message.system_labels.iter().map(|l| l.as_str()).collect();
    println!(
        "[{}] {} {} ({})",
        message.id,
        message.sent_at.format("%Y-%m-%d %H:%M"),
        message.subject,
        labels.join(", ")
    );
}

fn labels_update(
    values: [(SystemLabel, Option<String>); 4],
    clear: &[SystemLabel],
) -> UpdateLabelsRequest {
    let request = values
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| (label, value)))
        .fold(UpdateLabelsRequest::default(), |request, (label, value)| {
            request.set(label, Some(value))
        });
    clear
        .iter()
        .fold(request, |request, label| request.set(*label, None))
}

fn print_mapping(mapping: &LabelMapping) {
    for label in SystemLabel::ALL {
        println!("{:<20} {}", label.as_str(), mapping.get(label).unwrap_or("(unmapped)"));
    }
}

async fn handle_labels(services: &Services, action: LabelAction) -> anyhow::Result<()> {
    match action {
        LabelAction::Gmail => {
            let labels = services.labels.get_gmail_labels().await?;
            if labels.is_empty() {
                println!("No Gmail labels found.");
            }
            for label in labels {
                println!("{:<24} {}", label.value, label.label);
            }
        }
        LabelAction::Show => print_mapping(&services.labels.get_labels().await?),
        LabelAction::AutoCreate => {
            let mapping = services.labels.auto_create_labels().await?;
            println!("Labels created.");
            print_mapping(&mapping);
        }
        LabelAction::Set {
            class_registration,
            task,
            inquiry,
            other,
            clear,
        } => {
            let request = labels_update(
                [
                    (SystemLabel::ClassRegistration, class_registration),
                    (SystemLabel::Task, task),
                    (SystemLabel::Inquiry, inquiry),
                    (SystemLabel::Other, other),
                ],
                &clear,
            );
            if request.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one label or --clear");
            }
            services.labels.update_labels(&request).await?;
            println!("Label mapping updated.");
        }
    }
    Ok(())
}

async fn handle_domains(services: &Services, action: DomainAction) -> anyhow::Result<()> {
    match action {
        DomainAction::Show => {
            let domains = services.allowed_domains.get_allowed_domains().await?;
            if domains.is_empty() {
                println!("No allowed domains.");
            }
            for domain in domains {
                println!("{}", domain);
            }
        }
        DomainAction::Set { domains } => {
            let request = UpdateAllowedDomainsRequest {
                domains: domains.into_iter().map(|d| d.trim().to_ascii_lowercase()).collect(),
            };
            request
                .validate()
                .context("Domains must be a non-empty list without duplicates")?;
            services.allowed_domains.update_allowed_domains(&request).await?;
            println!("Allowed domains set to: {}", request.domains.join(", "));
        }
    }
    Ok(())
}

async fn handle_grants(services: &Services, action: GrantAction) -> anyhow::Result<()> {
    match action {
        GrantAction::Url => println!("{}", services.grants.get_gmail_auth_url().await?),
        GrantAction::Exchange { code } => {
            let request = CodeRequest { code };
            request.validate().context("Authorization code must not be empty")?;
            services.grants.grant_gmail_access(&request).await?;
            println!("Gmail access granted.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_parse_messages_list() {
        let cli = Cli::try_parse_from([
            "mailadmin",
            "messages",
            "list",
            "--label",
            "task",
            "--label",
            "inquiry",
            "--page",
            "2",
            "--sort-order",
            "desc",
        ])
        .unwrap();
        match cli.command {
            Commands::Messages {
                action: MessageAction::List { labels, page, limit, sort_order, .. },
            } => {
                assert_eq!(labels, vec![SystemLabel::Task, SystemLabel::Inquiry]);
                assert_eq!(page, 2);
                assert_eq!(limit, 10);
                assert!(matches!(sort_order, Some(SortArg::Desc)));
            }
            _ => panic!("expected messages list"),
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        assert!(Cli::try_parse_from(["mailadmin", "messages", "label", "1", "spam"]).is_err());
    }

    #[test]
    fn test_domains_set_requires_a_domain() {
        assert!(Cli::try_parse_from(["mailadmin", "domains", "set"]).is_err());
    }

    #[test]
    fn test_labels_update() {
        let request = labels_update(
            [
                (SystemLabel::ClassRegistration, None),
                (SystemLabel::Task, Some("Label_7".to_string())),
                (SystemLabel::Inquiry, None),
                (SystemLabel::Other, None),
            ],
            &[SystemLabel::Other],
        );
        assert_eq!(request.task, Some(Some("Label_7".to_string())));
        assert_eq!(request.other, Some(None));
        assert_eq!(request.class_registration, None);
        assert_eq!(request.inquiry, None);
    }

    #[tokio::test]
    async fn test_dynamic_data_failure_reports_field_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shared/dynamic-data"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "success": false,
                "statusCode": 422,
                "message": "Validation failed",
                "errors": [{ "field": "settings", "message": ["unknown key", "must be a list"] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let services = Services::new(ApiClient::native(ClientConfig::new(&server.uri()).unwrap()));
        let err = handle_dynamic_data(&services, vec!["email.nope".to_string()], Vec::new())
            .await
            .unwrap_err();

        assert_eq!(
            field_error_lines(&err),
            vec!["  settings: unknown key, must be a list".to_string()]
        );
    }

    #[test]
    fn test_field_error_lines_ignore_other_errors() {
        assert!(field_error_lines(&anyhow::anyhow!("boom")).is_empty());
    }
}
