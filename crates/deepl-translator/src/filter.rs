//! Resource filter for page loads.

use deepl_cdp::ResourceType;

/// Whether a request of this type is aborted. Only the document, scripts,
/// styles and XHR traffic are needed to render a translation.
pub fn should_block(resource_type: ResourceType) -> bool {
    matches!(
        resource_type,
        ResourceType::Image | ResourceType::Media | ResourceType::Font | ResourceType::Other
    )
}
