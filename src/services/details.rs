use tracing::{info, warn};

use super::rich_text::text_to_blocks;
use crate::store::{AssetRepo, PersonRole, RichTextBlock};
use crate::upstream::{PortraitSource, TextGenerator, UpstreamError};

#[derive(Debug, thiserror::Error)]
pub enum DetailsError {
    #[error("Missing or invalid field: {0}")]
    InvalidInput(&'static str),
    #[error("Biography generation failed: {0}")]
    BiographyGenerationFailed(#[source] UpstreamError),
}

/// Request for one person document, fields as received.
#[derive(Debug, Clone, Default)]
pub struct DetailRequest {
    pub document_id: Option<String>,
    pub name: Option<String>,
    pub document_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedDetails {
    pub biography: Vec<RichTextBlock>,
    pub image_asset_id: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, DetailsError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(DetailsError::InvalidInput(field))
}

fn role_label(role: PersonRole) -> &'static str {
    match role {
        PersonRole::Director => "regista",
        PersonRole::Actor => "attore/attrice",
    }
}

pub fn biography_prompt(name: &str, role: PersonRole) -> String {
    format!(
        "Scrivi una breve biografia enciclopedica, in italiano, per {} {}. \
         Concentrati sulla sua carriera cinematografica, i film più importanti \
         e il suo stile o i ruoli tipici. Massimo 150 parole.",
        role_label(role),
        name
    )
}

/// `Anna  Magnani` + `.jpg` -> `Anna-Magnani.jpg`
pub fn portrait_filename(name: &str, extension: &str) -> String {
    let stem: Vec<&str> = name.split_whitespace().collect();
    format!("{}{}", stem.join("-"), extension)
}

async fn write_biography<T: TextGenerator + ?Sized>(
    text: &T,
    name: &str,
    role: PersonRole,
) -> Result<Vec<RichTextBlock>, UpstreamError> {
    let generated = text.generate_text(&biography_prompt(name, role)).await?;
    let blocks = text_to_blocks(&generated);
    if blocks.is_empty() {
        return Err(UpstreamError::EmptyResponse("Text generation"));
    }
    Ok(blocks)
}

async fn acquire_portrait<P, A>(portraits: &P, assets: &A, name: &str) -> Result<String, UpstreamError>
where
    P: PortraitSource + ?Sized,
    A: AssetRepo + ?Sized,
{
    let path = portraits
        .find_profile_path(name)
        .await?
        .ok_or_else(|| UpstreamError::NoProfileImage(name.to_string()))?;
    let image = portraits.fetch_image(&path).await?;
    let filename = portrait_filename(name, &image.extension);
    let asset = assets
        .upload_image(image.data, &filename, &image.content_type)
        .await?;
    Ok(asset.id)
}

/// Produces a biography and a portrait asset for a person. Both upstream
/// paths run concurrently and are always awaited to completion. A failed
/// biography fails the call; a failed portrait only yields no image.
pub async fn generate_details<T, P, A>(
    text: &T,
    portraits: &P,
    assets: &A,
    request: &DetailRequest,
) -> Result<GeneratedDetails, DetailsError>
where
    T: TextGenerator + ?Sized,
    P: PortraitSource + ?Sized,
    A: AssetRepo + ?Sized,
{
    let document_id = required(&request.document_id, "documentId")?;
    let name = required(&request.name, "name")?;
    let role = required(&request.document_type, "documentType")
        .map(PersonRole::from_document_type)?
        .ok_or(DetailsError::InvalidInput("documentType"))?;

    let (biography, portrait) = tokio::join!(
        write_biography(text, name, role),
        acquire_portrait(portraits, assets, name),
    );

    let biography = match biography {
        Ok(blocks) => blocks,
        Err(e) => {
            if let Ok(ref asset_id) = portrait {
                warn!(document = document_id, asset = %asset_id, "Discarding uploaded portrait");
            }
            return Err(DetailsError::BiographyGenerationFailed(e));
        }
    };

    let image_asset_id = match portrait {
        Ok(asset_id) => Some(asset_id),
        Err(e) => {
            warn!(document = document_id, name, error = %e, "Portrait unavailable");
            None
        }
    };

    info!(
        document = document_id,
        role = role.as_str(),
        paragraphs = biography.len(),
        image = image_asset_id.is_some(),
        "Generated person details"
    );

    Ok(GeneratedDetails {
        biography,
        image_asset_id,
    })
}
