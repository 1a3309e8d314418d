//! `ytfetch fetch` – run the batch pipeline over the requested videos.

use crate::cli::{InputArgs, OptionArgs};
use anyhow::Result;
use ytfetch_core::{fetch_batch, id_parser, options};

pub async fn run_fetch(input: InputArgs, option_args: OptionArgs) -> Result<i32> {
    let options = option_args.apply(options::load_or_init()?);
    tracing::debug!("resolved options: {:?}", options);

    let mut inputs = input.ids.clone();
    if let Some(file) = &input.file {
        inputs.extend(id_parser::load_ids_from_file(file, &input.id_field)?);
    }
    if inputs.is_empty() {
        anyhow::bail!("no video IDs given; use --id or --file");
    }

    let batch = fetch_batch(&inputs, &options).await?;

    println!(
        "{} total, {} succeeded, {} failed (output: {})",
        batch.total,
        batch.succeeded,
        batch.failed,
        options.out.display()
    );
    for result in batch.results.iter().filter(|r| !r.errors.is_empty()) {
        for error in &result.errors {
            eprintln!("  {}: {}", result.video_id, error);
        }
    }

    // Exit signal: 0 all ok, 1 partial failure, 2 nothing succeeded.
    Ok(if batch.failed == 0 {
        0
    } else if batch.succeeded > 0 {
        1
    } else {
        2
    })
}
