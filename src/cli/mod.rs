//! CLI module for the employee registry
//!
//! - `serve`: run the HTTP API
//! - `signup`, `signin`, `add-employee`, `list-employees`: submit forms
//!   against a running server

pub mod client;
pub mod serve;

use clap::{Parser, Subcommand};

/// Employee registry - validated signup, signin and employee records
#[derive(Parser)]
#[command(name = "employee-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),

    /// Create an account
    Signup(client::SignupArgs),

    /// Check credentials
    Signin(client::SigninArgs),

    /// Submit the employee form
    AddEmployee(client::AddEmployeeArgs),

    /// Print all employee records as JSON
    ListEmployees(client::ConnectionArgs),
}
