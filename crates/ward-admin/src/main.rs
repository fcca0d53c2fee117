//! `ward`: administrative front door for the Ward account registry.
//!
//! Reads `ward.toml` (or the path given with `--config`), opens the SQLite
//! store, and runs one management command. Passwords are always read from
//! stdin, never taken as arguments.
//!
//! # Usage
//!
//! ```
//! ward create-superuser --first-name Ada --last-name Obi --reg-no ADM001 --phone 0700000001
//! ward list --role staff --json
//! ward login REG100 --module pharmacy
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ward_core::{
  access::GrantAll,
  account::{Gender, NewAccount, Role},
  store::AccountQuery,
};
use ward_store_sqlite::SqliteStore;

use commands::{Registry, render_json, render_table};
use settings::AdminConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Ward account registry administration")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ward.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create a regular (patient) account.
  CreateUser(CreateArgs),
  /// Create a staff account (doctors, nurses).
  CreateStaff(CreateArgs),
  /// Create an administrator account (IT, senior staff).
  CreateSuperuser(CreateArgs),
  /// List accounts.
  List {
    #[arg(long)]
    role:   Option<Role>,
    #[arg(long)]
    active: Option<bool>,
    /// Print JSON instead of a table.
    #[arg(long)]
    json:   bool,
  },
  /// Deactivate an account. The record is kept.
  Deactivate { reg_no: String },
  /// Attach a profile image to an account.
  SetProfile { reg_no: String, image: PathBuf },
  /// Check a password and report the account's role.
  Login {
    reg_no: String,
    /// Also report whether the account may use this module.
    #[arg(long)]
    module: Option<String>,
  },
}

#[derive(Args)]
struct CreateArgs {
  #[arg(long)]
  first_name: String,
  #[arg(long)]
  last_name:  String,
  /// Staff/patient registration number; used to log in.
  #[arg(long)]
  reg_no:     String,
  #[arg(long)]
  phone:      String,
  #[arg(long)]
  gender:     Option<Gender>,
  #[arg(long)]
  email:      Option<String>,
}

impl CreateArgs {
  fn into_new_account(self, secret: String) -> NewAccount {
    NewAccount {
      first_name: self.first_name,
      last_name:  self.last_name,
      reg_no:     self.reg_no,
      phone:      self.phone,
      gender:     self.gender,
      email:      self.email,
      secret,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AdminConfig::load(&cli.config)?;

  let store_path = cfg.resolved_store_path();
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let registry = Registry::new(std::sync::Arc::new(store), cfg.policy, GrantAll);

  match cli.command {
    Command::CreateUser(args) => create(&registry, Role::Standard, args).await,
    Command::CreateStaff(args) => create(&registry, Role::Staff, args).await,
    Command::CreateSuperuser(args) => create(&registry, Role::Administrator, args).await,
    Command::List { role, active, json } => {
      let query = AccountQuery { role, active, ..Default::default() };
      let accounts = registry.list(&query).await?;
      if json {
        println!("{}", render_json(&accounts)?);
      } else {
        print!("{}", render_table(&accounts));
      }
      Ok(())
    }
    Command::Deactivate { reg_no } => {
      let account = registry.deactivate(&reg_no).await?;
      println!("{account} deactivated");
      Ok(())
    }
    Command::SetProfile { reg_no, image } => {
      let profile = registry.set_profile(&reg_no, &image).await?;
      println!("{reg_no}: {} ({})", profile.image.path, profile.image.content_hash);
      Ok(())
    }
    Command::Login { reg_no, module } => {
      let secret = read_secret("Password: ")?;
      let Some(account) = registry.login(&reg_no, &secret).await? else {
        bail!("invalid credentials or inactive account");
      };
      println!("{account}: {} ({})", account.full_name(), account.role());
      if let Some(module) = module {
        let verdict = if registry.may_access(&account, &module) { "granted" } else { "denied" };
        println!("module {module}: {verdict}");
      }
      Ok(())
    }
  }
}

async fn create(
  registry: &Registry<SqliteStore, GrantAll>,
  role: Role,
  args: CreateArgs,
) -> anyhow::Result<()> {
  let secret = read_secret("Password: ")?;
  let account = registry.create(role, args.into_new_account(secret)).await?;
  println!("created {} account {account} (id {})", account.role(), account.account_id);
  Ok(())
}

/// Read a password from stdin (no echo suppression).
fn read_secret(prompt: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  eprint!("{prompt}");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
