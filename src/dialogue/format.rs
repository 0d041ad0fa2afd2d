//! HTML reply fragments: product listings, preview cards and outfits.

use super::messages;
use crate::catalog::Product;
use crate::outfit::{Outfit, OutfitPreferences};

/// Bulleted product listing under a bold title. An empty listing renders
/// the fixed "nothing matched" message instead.
pub fn format_product_list(items: &[&Product], title: &str) -> String {
    if items.is_empty() {
        return messages::EMPTY_RESULT.to_string();
    }

    let mut msg = format!("<b>{title}</b><br>");
    for p in items {
        msg.push_str(&format!("• {} (£{:.2})<br>", p.name, p.price));
    }
    msg
}

/// Clickable card linking to the product page.
pub fn product_preview_card(product: &Product) -> String {
    format!(
        "<a class='chat-product-card' href='/product/{id}' target='_blank'>\
         <img class='chat-product-img' src='/static/product_images/{image}' alt='{name}'>\
         <span class='chat-product-info'>\
         <span class='chat-product-name'>{name}</span>\
         <span class='chat-product-price'>£{price:.2}</span>\
         </span></a>",
        id = product.id,
        image = product.image_file(),
        name = product.name,
        price = product.price,
    )
}

/// One outfit slot as a linked item with image and color dots.
fn outfit_item_html(label: &str, product: &Product) -> String {
    let img_html = format!(
        "<img class='outfit-img' src='/static/product_images/{}' alt='{}'>",
        product.image_file(),
        product.name
    );

    let dots = if product.colors.is_empty() {
        String::new()
    } else {
        let spans: String = product
            .colors
            .iter()
            .map(|c| format!("<span class='color-dot {c}'></span>"))
            .collect();
        format!("<div class='color-dots'>{spans}</div>")
    };

    format!(
        "<a class=\"outfit-item\" href=\"/product/{id}\">{img_html}\
         <div class=\"outfit-text\"><b>{label}</b><br>{name}<br>£{price:.2}{dots}</div></a>",
        id = product.id,
        name = product.name,
        price = product.price,
    )
}

/// The full outfit reply: preview grid, total, rationale and style footer.
/// Incomplete outfits render the fixed apology instead.
pub fn format_outfit(outfit: &Outfit, prefs: &OutfitPreferences) -> String {
    if !outfit.is_complete() {
        return messages::OUTFIT_INCOMPLETE.to_string();
    }

    let parts_html: String = outfit
        .items()
        .map(|(label, product)| outfit_item_html(label, product))
        .collect();

    let mut why: Vec<String> = Vec::new();
    if let Some(occasion) = prefs.occasion {
        why.push(format!(
            "Occasion: <b>{occasion}</b> — picked items that fit that vibe."
        ));
    }
    if let Some(weather) = prefs.weather {
        why.push(format!(
            "Weather: <b>{weather}</b> — chose pieces that suit the conditions."
        ));
    }
    if !prefs.colors.is_empty() {
        why.push(format!(
            "Colours: <b>{}</b> — prioritised items in your colours.",
            prefs.colors.join(", ")
        ));
    }
    if let Some(budget) = prefs.budget {
        why.push(format!(
            "Budget: <b>£{budget:.0}</b> — tried to stay within it where possible."
        ));
    }

    let why_html: String = why
        .iter()
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>()
        .join("<br>");

    format!(
        "<b>Your Outfit:</b><br><div class='outfit-preview'>{parts_html}</div>\
         <br><b>Total:</b> £{total:.2}\
         <br><br><b>Why this outfit?</b><br>{why_html}\
         <br><br>Want it more <b>minimal</b>, <b>bold</b>, or <b>trendy</b>?",
        total = outfit.total_price(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outfit::{Occasion, Weather};

    fn product(id: u32, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.into(),
            category: "T-Shirts".into(),
            price,
            stock: 1,
            sizes: vec![],
            colors: vec!["black".into()],
            fit: None,
            material: None,
            care: None,
            style_tips: vec![],
            image: None,
        }
    }

    #[test]
    fn test_empty_listing_renders_fixed_message() {
        assert_eq!(format_product_list(&[], "Title:"), messages::EMPTY_RESULT);
    }

    #[test]
    fn test_listing_contains_title_and_prices() {
        let tee = product(1, "Plain Tee", 9.99);
        let listing = format_product_list(&[&tee], "Here are our t-shirts:");
        assert!(listing.contains("<b>Here are our t-shirts:</b>"));
        assert!(listing.contains("Plain Tee (£9.99)"));
    }

    #[test]
    fn test_outfit_rationale_mentions_preferences() {
        let outfit = Outfit {
            top: Some(product(1, "Oxford Shirt", 34.99)),
            bottom: Some(product(2, "Slim Chino Trousers", 44.99)),
            shoes: Some(product(3, "Leather Oxford Shoes", 89.99)),
            accessory: None,
        };
        let prefs = OutfitPreferences {
            occasion: Some(Occasion::Work),
            weather: Some(Weather::Cold),
            budget: Some(80.0),
            ..Default::default()
        };

        let html = format_outfit(&outfit, &prefs);
        assert!(html.contains("<b>work</b>"));
        assert!(html.contains("<b>cold</b>"));
        assert!(html.contains("<b>£80</b>"));
        assert!(html.contains("<b>Total:</b> £169.97"));
    }

    #[test]
    fn test_incomplete_outfit_renders_apology() {
        let outfit = Outfit::default();
        let html = format_outfit(&outfit, &OutfitPreferences::default());
        assert_eq!(html, messages::OUTFIT_INCOMPLETE);
    }
}
