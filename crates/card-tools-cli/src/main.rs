use anyhow::{Context, Result, bail};
use card_export::{CsvOptions, ExportAssets, export_pdf_bytes, rows_from_csv, rows_from_urls, valid_row_count};
use card_layout::{DataRow, DocumentModel, PAGE_PRESETS, find_preset};
use card_preview::{PreviewAssets, render_row_preview};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardt", about = "QR card layout tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every valid row to a multi-page PDF
    Export {
        /// Input file: URL list (one per line) or CSV with headers
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "urls", value_enum)]
        format: FormatArg,

        /// Document template JSON (defaults to the built-in design)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Page preset id (overrides the template's page size)
        #[arg(long)]
        preset: Option<String>,

        /// Background image file
        #[arg(long)]
        base_image: Option<PathBuf>,

        /// Logo image file (drawn over the code center)
        #[arg(long)]
        logo: Option<PathBuf>,

        /// CSV column holding the payload
        #[arg(long, default_value = "url")]
        payload_column: String,

        /// CSV column holding the label
        #[arg(long, default_value = "label")]
        label_column: String,

        /// Label template, e.g. "{index}. {label}"
        #[arg(long, default_value = "{label}")]
        label_template: String,

        /// Accept schemes other than http/https
        #[arg(long)]
        allow_non_http: bool,
    },

    /// Render one row to a PNG preview
    Preview {
        /// Payload to encode
        #[arg(long)]
        payload: String,

        /// Caption text
        #[arg(long, default_value = "")]
        label: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Document template JSON
        #[arg(long)]
        template: Option<PathBuf>,

        /// Page preset id
        #[arg(long)]
        preset: Option<String>,

        /// Background image file
        #[arg(long)]
        base_image: Option<PathBuf>,

        /// Logo image file
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Pixels per point
        #[arg(long, default_value = "2.0")]
        scale: f32,
    },

    /// List the built-in page presets
    Presets,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Urls,
    Csv,
}

async fn load_document(template: Option<&PathBuf>, preset: Option<&str>) -> Result<DocumentModel> {
    let mut doc = match template {
        Some(path) => DocumentModel::load(path)
            .await
            .with_context(|| format!("Failed to load template {}", path.display()))?,
        None => DocumentModel::with_defaults(),
    };
    if let Some(id) = preset {
        let Some(preset) = find_preset(id) else {
            bail!("Unknown preset '{id}'. Run `cardt presets` for the list.");
        };
        doc.page.width_pts = preset.width_pts;
        doc.page.height_pts = preset.height_pts;
        doc.page.preset_id = preset.id.to_string();
    }
    Ok(doc)
}

async fn load_raster(path: Option<&PathBuf>) -> Result<Option<image::RgbaImage>> {
    match path {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let image = card_raster::decode_image(&bytes)
                .with_context(|| format!("Failed to decode {}", path.display()))?;
            Ok(Some(image))
        }
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            template,
            preset,
            base_image,
            logo,
            payload_column,
            label_column,
            label_template,
            allow_non_http,
        } => {
            let doc = load_document(template.as_ref(), preset.as_deref()).await?;
            let text = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let rows: Vec<DataRow> = match format {
                FormatArg::Urls => rows_from_urls(&text, allow_non_http),
                FormatArg::Csv => rows_from_csv(
                    &text,
                    &CsvOptions {
                        payload_column,
                        label_column,
                        label_template,
                        allow_non_http,
                    },
                )?,
            };

            let valid = valid_row_count(&rows);
            println!("Rows: {} total, {} valid", rows.len(), valid);
            for row in rows.iter().filter(|r| !r.is_valid()) {
                eprintln!("  row {}: {}", row.index, row.errors.join("; "));
            }

            let assets = ExportAssets {
                base_image: load_raster(base_image.as_ref()).await?,
                logo: load_raster(logo.as_ref()).await?,
            };

            let bytes = tokio::task::spawn_blocking(move || {
                let mut on_progress = |current: usize, total: usize| {
                    println!("  page {current}/{total}");
                };
                export_pdf_bytes(&doc, &rows, &assets, Some(&mut on_progress))
            })
            .await??;

            tokio::fs::write(&output, bytes).await?;
            println!("Exported {} pages → {}", valid, output.display());
        }

        Commands::Preview {
            payload,
            label,
            output,
            template,
            preset,
            base_image,
            logo,
            scale,
        } => {
            let doc = load_document(template.as_ref(), preset.as_deref()).await?;
            let assets = PreviewAssets {
                base_image: load_raster(base_image.as_ref()).await?,
                logo: load_raster(logo.as_ref()).await?,
            };
            let row = DataRow {
                payload,
                label,
                index: 1,
                errors: Vec::new(),
            };

            let image = render_row_preview(&doc, Some(&row), &assets, scale)?;
            image
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Rendered {}x{} preview → {}",
                image.width(),
                image.height(),
                output.display()
            );
        }

        Commands::Presets => {
            println!("Available page presets:");
            for preset in PAGE_PRESETS {
                println!(
                    "  {:<16} {} ({:.0} x {:.0} pt)",
                    preset.id, preset.name, preset.width_pts, preset.height_pts
                );
            }
        }
    }

    Ok(())
}
