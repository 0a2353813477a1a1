pub mod imagekit;
pub mod traits;

use crate::models::{extension_for, Variation};
use uuid::Uuid;

pub use imagekit::ImageKitStorage;
pub use traits::MediaStorage;

pub const DEFAULT_FOLDER: &str = "/ad-creatives";
pub const DEFAULT_CAMPAIGN: &str = "default";

/// `ad_{campaign}_{variation}_{8 hex}.{ext}`, with the extension taken from the media type.
pub fn upload_file_name(campaign_id: &str, variation: Variation, mime_type: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "ad_{}_{}_{}.{}",
        campaign_id,
        variation,
        &suffix[..8],
        extension_for(mime_type)
    )
}

pub fn upload_tags(campaign_id: &str, variation: Variation) -> Vec<String> {
    vec![
        format!("campaign:{}", campaign_id),
        format!("variation:{}", variation),
    ]
}
