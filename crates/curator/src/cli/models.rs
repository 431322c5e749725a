//! The `curator models` command for managing the CLIP model files.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use curator_core::embedding::{TEXT_MODEL_FILENAME, TOKENIZER_FILENAME, VISUAL_MODEL_FILENAME};
use curator_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download the CLIP vision encoder, text encoder and tokenizer
    Download,

    /// List installed model files
    List,

    /// Show model directory path
    Path,
}

/// One file fetched from the Hugging Face repo.
struct ModelFile {
    label: &'static str,
    remote_path: &'static str,
    local_name: &'static str,
}

/// ONNX export of openai/clip-vit-base-patch32.
const MODEL_REPO: &str = "Xenova/clip-vit-base-patch32";

const MODEL_FILES: &[ModelFile] = &[
    ModelFile {
        label: "Vision encoder",
        remote_path: "onnx/vision_model.onnx",
        local_name: VISUAL_MODEL_FILENAME,
    },
    ModelFile {
        label: "Text encoder",
        remote_path: "onnx/text_model.onnx",
        local_name: TEXT_MODEL_FILENAME,
    },
    ModelFile {
        label: "Tokenizer",
        remote_path: "tokenizer.json",
        local_name: TOKENIZER_FILENAME,
    },
];

/// Execute the models command.
pub fn execute(args: ModelsArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let model_dir = config.embedding_model_dir();

    match args.command {
        ModelsCommand::Download => {
            println!("Downloading CLIP ViT-B/32 ({MODEL_REPO}) to {}\n", model_dir.display());
            println!("  Vision encoder + text encoder + tokenizer (~600MB, fp32).\n");

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(download_all(&model_dir))?;

            tracing::info!("All downloads complete.");
        }

        ModelsCommand::List => {
            if !model_dir.exists() {
                println!("No models installed.");
                println!("Run `curator models download` to download required models.");
                return Ok(());
            }

            println!("Installed models:");
            println!("  Directory: {}\n", model_dir.display());
            for file in MODEL_FILES {
                let status = if model_dir.join(file.local_name).exists() {
                    "ready"
                } else {
                    "not installed"
                };
                println!("    - {:30} {}", file.local_name, status);
            }
        }

        ModelsCommand::Path => {
            println!("{}", model_dir.display());
        }
    }

    Ok(())
}

/// Download every missing model file into `model_dir`.
async fn download_all(model_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(model_dir)?;
    let client = reqwest::Client::new();

    for file in MODEL_FILES {
        let dest = model_dir.join(file.local_name);
        if dest.exists() {
            tracing::info!("{} already exists at {:?}", file.label, dest);
            continue;
        }

        let url = remote_url(file.remote_path);
        tracing::info!("Downloading {}...", file.label.to_lowercase());
        tracing::info!("  Source: {}", url);
        tracing::info!("  Destination: {:?}", dest);

        download_file(&client, &url, &dest).await?;

        let file_size = std::fs::metadata(&dest)?.len();
        tracing::info!(
            "  {} complete ({:.1} MB)",
            file.label,
            file_size as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(())
}

fn remote_url(remote_path: &str) -> String {
    format!("https://huggingface.co/{MODEL_REPO}/resolve/main/{remote_path}")
}

/// Sibling path an in-progress download is written to.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Stream `url` to `dest`.
///
/// Bytes land in a `.part` file first, which is renamed once complete, so an
/// interrupted download is never mistaken for an installed model.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let total_size = response.content_length();
    if let Some(size) = total_size {
        tracing::info!("  Size: {:.1} MB", size as f64 / (1024.0 * 1024.0));
    }

    let partial = partial_path(dest);
    let mut file = tokio::fs::File::create(&partial).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(total) = total_size {
            if downloaded % (50 * 1024 * 1024) < chunk.len() as u64 {
                tracing::info!(
                    "  Progress: {:.0}%",
                    downloaded as f64 / total as f64 * 100.0
                );
            }
        }
    }

    file.flush().await?;
    drop(file);

    if let Some(total) = total_size {
        if downloaded != total {
            let _ = tokio::fs::remove_file(&partial).await;
            anyhow::bail!(
                "Incomplete download of {url}: got {downloaded} of {total} bytes. Try again."
            );
        }
    }

    tokio::fs::rename(&partial, dest).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_url_points_at_resolve_endpoint() {
        assert_eq!(
            remote_url("onnx/vision_model.onnx"),
            "https://huggingface.co/Xenova/clip-vit-base-patch32/resolve/main/onnx/vision_model.onnx"
        );
    }

    #[test]
    fn partial_path_is_sibling() {
        let dest = Path::new("/models/clip/visual.onnx");
        assert_eq!(partial_path(dest), Path::new("/models/clip/visual.onnx.part"));
    }

    #[test]
    fn model_files_match_engine_layout() {
        let config = Config::default();
        let expected = curator_core::embedding::model_files(&config);
        let dir = config.embedding_model_dir();
        let listed: Vec<_> = MODEL_FILES.iter().map(|f| dir.join(f.local_name)).collect();
        assert_eq!(listed, expected);
    }
}
