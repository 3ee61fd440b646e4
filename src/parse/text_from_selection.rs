use scraper::{ElementRef, Selector};

use super::Error;

/// The text of the first element matching `selector`, with surrounding whitespace trimmed.
pub fn text_from_selection(
    selector: &Selector,
    element: ElementRef<'_>,
    parent_label: &str,
    child_label: &str,
) -> Result<String, Error> {
    let child = element
        .select(selector)
        .next() // first match
        .ok_or_else(|| {
            Error::html_parse_error(&format!(
                "Every {parent_label} element should have a {child_label}."
            ))
        })?;
    let text: String = child.text().collect();
    if text.trim().is_empty() {
        // capitalize the first letter of the label
        let mut child_label = child_label.to_string();
        if let Some(first) = child_label.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        return Err(Error::text_parse_error(&format!(
            "{child_label} should have text inside."
        )));
    }
    Ok(text.trim().to_string())
}

/// The text nodes directly inside `element`, ignoring the text of nested elements.
pub fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect()
}
