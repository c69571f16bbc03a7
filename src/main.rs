use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tabconvert::config::{Cli, Command, ConvertArgs};
use tabconvert::format::output_file_name;
use tabconvert::{logger, server, ConversionRequest, Dispatcher, Format, FormatPair};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.log_json);

    match cli.command {
        Command::Serve(config) => server::serve(config).await,
        Command::Convert(args) => {
            let output = tokio::task::spawn_blocking(move || convert_file(&args)).await??;
            println!("{}", output.display());
            Ok(())
        }
        Command::Formats => {
            for id in Dispatcher::new().list_supported_formats() {
                println!("{}", id);
            }
            Ok(())
        }
    }
}

fn convert_file(args: &ConvertArgs) -> anyhow::Result<PathBuf> {
    let source = Format::from_path(&args.input).with_context(|| {
        format!(
            "Cannot tell the format of {} from its extension",
            args.input.display()
        )
    })?;
    let target: Format = args.to.parse()?;
    if source == target {
        bail!("{} is already {}", args.input.display(), target);
    }

    let content = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let request = ConversionRequest::new(
        file_name.as_str(),
        content,
        FormatPair::new(source, target).id(),
    );
    let file = Dispatcher::new()
        .with_options(args.decode.options())
        .convert(&request)?;

    let output = match &args.output {
        Some(path) => path.clone(),
        None => args
            .input
            .with_file_name(output_file_name(&file_name, Some(target))),
    };
    std::fs::write(&output, &file.content)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        input = %args.input.display(),
        output = %output.display(),
        records = file.metadata.record_count,
        "converted"
    );
    Ok(output)
}
