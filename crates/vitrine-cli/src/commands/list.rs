use vitrine_core::query::{FieldPatch, SearchPatch};

use crate::commands::common::{
    build_synchronizer, format_promotion_lines, promotion_to_list_item, PromotionListItem,
};
use crate::error::CliError;

pub async fn run_list(
    api_url: Option<&str>,
    tenant: Option<&str>,
    active: Option<bool>,
    name: Option<&str>,
    page: u32,
    limit: u32,
    as_json: bool,
) -> Result<(), CliError> {
    let (sync, _notices) = build_synchronizer(api_url, tenant)?;

    sync.update_search_params(&SearchPatch {
        is_active: active.map_or(FieldPatch::Keep, FieldPatch::Set),
        name: name.map_or(FieldPatch::Keep, |name| FieldPatch::Set(name.to_string())),
        page_size: Some(limit),
        ..SearchPatch::default()
    });
    sync.go_to_page(page);

    let result = sync.ensure_current().await?;

    if as_json {
        let json_items = result
            .items
            .iter()
            .map(promotion_to_list_item)
            .collect::<Vec<PromotionListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_promotion_lines(&result.items) {
            println!("{line}");
        }
        println!(
            "page {} of {} promotion(s)",
            result.page, result.total_count
        );
    }

    Ok(())
}
