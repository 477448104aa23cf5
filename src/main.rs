use clap::Parser;
use employee_registry::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Signup(args) => cli::client::signup(args).await,
        Command::Signin(args) => cli::client::signin(args).await,
        Command::AddEmployee(args) => cli::client::add_employee(args).await,
        Command::ListEmployees(args) => cli::client::list_employees(args).await,
    }
}
