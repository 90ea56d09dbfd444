use std::path::PathBuf;

use clap::Parser;

use git_sync_publish::cli::{run_publish_workflow, PublishWorkflowArgs};
use git_sync_publish::{config, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-sync-publish",
    version,
    about = "Commit, sync, version and tag a git repository in one step"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short = 'C', long, default_value = ".", help = "Run as if started in this directory")]
    path: PathBuf,

    #[arg(short = 'y', long = "yes", help = "Answer yes to every confirmation")]
    assume_yes: bool,

    #[arg(short, long, help = "Log each step to stderr")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    ui::init_logging(args.verbose);

    let config = match config::load_config(args.config.as_deref(), &args.path) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let workflow_args = PublishWorkflowArgs {
        path: args.path,
        assume_yes: args.assume_yes,
    };

    if let Err(e) = run_publish_workflow(workflow_args, &config) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
