//! Form commands - submit signup, signin and employee forms to a running server

use std::sync::Arc;

use clap::Args;

use crate::client::{HttpStore, Screen, SubmissionController, SubmissionOutcome};
use crate::config::{AppConfig, LoggingConfig};
use crate::domain::{FormKind, IdempotencyKey, RawFields, Store};
use crate::infrastructure::logging;

#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Registry base URL (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct SignupArgs {
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub password: String,
    /// Defaults to the password
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Clone, Debug)]
pub struct SigninArgs {
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub password: String,
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Clone, Debug)]
pub struct AddEmployeeArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub position: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub hire_date: String,
    /// Makes a resubmit of the same form safe
    #[arg(long)]
    pub idempotency_key: Option<String>,
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl SignupArgs {
    pub fn raw_fields(&self) -> RawFields {
        RawFields::new()
            .with("email", &self.email)
            .with("password", &self.password)
            .with(
                "confirmPassword",
                self.confirm_password.as_deref().unwrap_or(&self.password),
            )
    }
}

impl SigninArgs {
    pub fn raw_fields(&self) -> RawFields {
        RawFields::new()
            .with("email", &self.email)
            .with("password", &self.password)
    }
}

impl AddEmployeeArgs {
    pub fn raw_fields(&self) -> RawFields {
        RawFields::new()
            .with("name", &self.name)
            .with("email", &self.email)
            .with("position", &self.position)
            .with("phone", &self.phone)
            .with("hireDate", &self.hire_date)
    }
}

fn connect(connection: &ConnectionArgs) -> anyhow::Result<HttpStore> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&LoggingConfig {
        level: "warn".to_string(),
        format: config.logging.format,
    })?;

    let mut client = config.client;
    if let Some(base_url) = &connection.base_url {
        client.base_url = base_url.clone();
    }

    Ok(HttpStore::from_config(&client)?)
}

pub async fn signup(args: SignupArgs) -> anyhow::Result<()> {
    let store = connect(&args.connection)?;
    submit(FormKind::SignUp, Arc::new(store), None, &args.raw_fields()).await
}

pub async fn signin(args: SigninArgs) -> anyhow::Result<()> {
    let store = connect(&args.connection)?;
    submit(FormKind::SignIn, Arc::new(store), None, &args.raw_fields()).await
}

pub async fn add_employee(args: AddEmployeeArgs) -> anyhow::Result<()> {
    let store = connect(&args.connection)?;
    let key = args
        .idempotency_key
        .as_deref()
        .map(IdempotencyKey::new)
        .transpose()?;

    submit(FormKind::Employee, Arc::new(store), key, &args.raw_fields()).await
}

pub async fn list_employees(args: ConnectionArgs) -> anyhow::Result<()> {
    let store = connect(&args)?;
    let employees = store.list_employees().await?;

    println!("{}", serde_json::to_string_pretty(&employees)?);
    Ok(())
}

async fn submit(
    kind: FormKind,
    store: Arc<dyn Store>,
    idempotency_key: Option<IdempotencyKey>,
    raw: &RawFields,
) -> anyhow::Result<()> {
    let mut controller = SubmissionController::new(kind, store);
    if let Some(key) = idempotency_key {
        controller = controller.with_idempotency_key(key);
    }

    match controller.submit(raw).await {
        SubmissionOutcome::Succeeded {
            notification,
            navigate_to,
        } => {
            println!("{}", notification);
            println!("Next: {}", screen_hint(navigate_to));
            Ok(())
        }
        SubmissionOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {}", field, message);
            }
            anyhow::bail!("{} field(s) invalid", errors.len())
        }
        SubmissionOutcome::Failed { notification } => anyhow::bail!("{}", notification),
        SubmissionOutcome::Busy => anyhow::bail!("A submission is already in progress"),
    }
}

fn screen_hint(screen: Screen) -> &'static str {
    match screen {
        Screen::SignIn => "signin",
        Screen::SignUp => "signup",
        Screen::Employee => "add-employee",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_confirm_defaults_to_password() {
        let args = SignupArgs {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: None,
            connection: ConnectionArgs::default(),
        };

        assert_eq!(args.raw_fields().get("confirmPassword"), Some("secret1"));
    }

    #[test]
    fn test_screen_hint_names_commands() {
        assert_eq!(screen_hint(Screen::SignIn), "signin");
        assert_eq!(screen_hint(Screen::Employee), "add-employee");
    }
}
