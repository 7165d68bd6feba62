use crate::{cli::RemoveArgs, config::Config};
use anyhow::{Context, Result, bail};
use image_compare::{Divider, download_file_name};
use relay_client::{RelayClient, SelectedFile};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub async fn run(config: &Config, args: RemoveArgs) -> Result<()> {
    let file = SelectedFile::from_path(&args.file)
        .with_context(|| format!("read {} failed", args.file.display()))?;

    let mut client_config = config.client_config();
    if let Some(relay_url) = args.relay.clone() {
        client_config = client_config.with_relay_url(relay_url);
    }

    let client = RelayClient::new(client_config)?;
    log::info!("removing background of {} via {}", file.name, client.config().relay_url);

    let result = match client.remove_background(&file).await {
        Ok(result) => result,
        Err(e) => bail!("{}", e.user_message()),
    };

    let processed = result.processed_bytes()?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(download_file_name()));

    write_outputs(&file.bytes, &processed, &out, args.compare.as_deref(), args.divider)
}

fn write_outputs(
    original: &[u8],
    processed: &[u8],
    out: &Path,
    compare: Option<&Path>,
    divider: f32,
) -> Result<()> {
    fs::write(out, processed).with_context(|| format!("write {} failed", out.display()))?;
    log::info!("saved {}", out.display());

    if let Some(compare) = compare {
        let divider = Divider::new(divider);
        image_compare::compose_from_bytes(original, processed, divider.position())?
            .save(compare)
            .with_context(|| format!("write {} failed", compare.display()))?;
        log::info!("saved comparison at {:.0}% to {}", divider.position(), compare.display());
    }

    Ok(())
}
