use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::path::Path;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by podfix.
    PrintSchemas,
    /// Scaffold a golden fixture (tests/fixtures/<name>/{Podfile,args.toml}).
    NewFixture {
        name: String,
        #[arg(long)]
        project_name: String,
        #[arg(long)]
        sdk_version: Option<String>,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", podfix_types::schema::PODFIX_REPORT_V1);
        }
        Command::NewFixture {
            name,
            project_name,
            sdk_version,
        } => {
            let dir = Path::new("tests").join("fixtures").join(&name);
            if dir.exists() {
                anyhow::bail!("fixture {} already exists", dir.display());
            }
            fs::create_dir_all(dir.join("expected"))?;

            let mut args = format!("project_name = \"{project_name}\"\n");
            if let Some(v) = sdk_version {
                args.push_str(&format!("sdk_version = \"{v}\"\n"));
            }
            fs::write(dir.join("args.toml"), args)?;
            fs::write(
                dir.join("Podfile"),
                format!("target '{project_name}' do\n  config = use_native_modules!\nend\n"),
            )?;
            println!(
                "initialized {}; edit the Podfile, then run `cargo run -p xtask -- bless-fixtures`",
                dir.display()
            );
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "podfix-domain", "--test", "golden_fixtures"])
                .env("PODFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}
