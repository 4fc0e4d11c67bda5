use anyhow::Result;
use ecr_client::cli::{Args, Runner};
use ecr_client::logging;
use ecr_client::output::OutputFormat;
use std::process;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();
    logging::init_logger(args.verbose, args.quiet, args.output == OutputFormat::Json)?;

    let runner = Runner::new(args)?;
    if let Err(e) = runner.run().await {
        runner.output().error(&e.to_string());
        process::exit(1);
    }

    Ok(())
}
