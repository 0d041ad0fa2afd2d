//! Canned reply text and quick-reply button sets.
//!
//! All user-facing fixed strings live here so the dispatcher reads as
//! routing logic. Replies may embed simple inline HTML (`<b>`, `<br>`,
//! links); the transport renders or strips it.

use super::reply::Button;

pub const GREETING: &str = "Hi there! 👋 I'm your Customer Support Chatbot. How can I help you \
     today? You can ask me to build an outfit, FAQs or whatever you want me to show you. 😊";

pub const ABOUT_BOT: &str = "<b>I can help with quite a few things</b>😊<br><br>\
     • I can build outfits based on your style🕴🪄<br>\
     • You can ask me to browse categories, like hoodies or jackets💻<br>\
     • I can filter products by price (for example, shoes under £50)💸<br>\
     • You can search by colour, like black jackets🔎<br>\
     • I answer common questions about opening hours, location, shipping, and returns🤔<br>\
     • I can also recommend sizes using the “Ask chatbot about this product 💬” button on \
     product's pages📏<br><br>\
     Just tell me what you're looking for!🌟";

pub const ABOUT_STORE: &str = "Welcome to <b>UoB Fashion!</b> ✨<br>\
     We're a fashion store offering everyday looks — t-shirts, hoodies, jackets, trousers, \
     shoes, socks and accessories.<br>\
     If you tell me what you're looking for, I'll help you find something.<br>\
     Or just say 'build me an outfit' and I'll create an outfit for your occasion";

pub const FRUSTRATION_APOLOGY: &str =
    "Sorry about that 😅 I can see this is frustrating. Let's try one of these options:";

pub const SUPPORT_INFO: &str = "Here's how you can get help 👇<br>\
     📧 Email: <a href='mailto:support@uobfashion.example'>support@uobfashion.example</a><br>\
     🧾 Or visit: <a href='/support' target='_blank'>Customer Support Page</a>";

pub const OPEN_SUPPORT_PAGE: &str =
    "Opening support page: <a href='/support' target='_blank'>Customer Support</a>";

pub const EMAIL_SUPPORT: &str =
    "Email us here: <a href='mailto:support@uobfashion.example'>support@uobfashion.example</a>";

pub const SUPPORT_OPTIONS: &str = "Customer Support options 👇: you can raise your complaint or \
     report a technical issue via the support team's email. Stay rested, and the team will sort \
     out your raise.😊";

pub const HELP_MENU: &str = "Here are some quick options that could help you👇";

pub const HOURS: &str = "🕒 Our store is open Monday to Saturday, from 9 AM to 8 PM.";

pub const LOCATION: &str = "📍 Our store is located at B15 2TT Fashion Street, Birmingham.";

pub const DELIVERY: &str = "🚚 We offer free delivery on orders over £50, £4.99 delivery fees \
     apply if less. Standard shipping takes 3–5 business days.";

pub const RETURNS: &str = "↩️ You can return any item within 14 days of purchase, as long as \
     it's unworn and in original packaging. You can follow the instructions in the return page \
     to process your refunds and return the items";

pub const THANKS_REPLY: &str =
    "I'm glad I could help! 😊 Let me know if you need help with anything else.";

pub const BYE_REPLY: &str = "Goodbye! 👋 Have a great day.";

pub const SMALL_TALK_REPLY: &str = "I'm just a helpful bot 😄 How can I assist you today?";

pub const FALLBACK: &str = "I'm sorry, I didn't quite understand that. 🤔 I can help with \
     building an outfit, list products, product details, store hours, or returns. What would \
     you like to know? Or you can say 'help' to reach the support team's email.";

pub const BROWSE_ALL_REDIRECT: &str = "You'll probably find it easier to browse everything in \
     the Store page (with pictures 😅). Try /store or click Store in the navbar!";

pub const OCCASION_PROMPT: &str = "Sure 😄 What's the occasion? 🤔👇";

pub const WEATHER_PROMPT: &str = "Cool! What's the weather like? 👇";

pub const COLORS_PROMPT: &str =
    "Choose or type your preferred colour. (or press No Preference) 👇";

pub const BUDGET_PROMPT: &str = "What's your budget in £? (e.g., 80) or press 'Open Budget'";

pub const NO_LAST_OUTFIT: &str =
    "I don't have your last outfit preferences yet 😅 Type: build me an outfit";

pub const OUTFIT_INCOMPLETE: &str =
    "I couldn't build a full outfit from the current stock 😅 Try a different occasion or budget.";

pub const MINIMAL_DEFINITION: &str = "<b>Minimal</b> style keeps it simple + clean: neutral \
     colours, fewer patterns, and timeless pieces. Example: plain tee/shirt + jeans/trousers + \
     simple shoes.";

pub const BOLD_DEFINITION: &str = "<b>Bold</b> brings stronger colours, standout pieces, or a \
     sharper contrast. Example: graphic top / leather / bright accent + confident shoes.";

pub const TRENDY_DEFINITION: &str = "<b>Trendy</b> means more “current style”: modern cuts, \
     popular combos, and streetwear touches. Example: oversized hoodie, cargo pants, chunky \
     sneakers, caps/bags.";

pub const EMPTY_RESULT: &str = "Sorry, I couldn't find anything matching that. Try a different \
     colour/size/price or category.";

pub const PRODUCT_NOT_FOUND: &str = "Sorry, I couldn't find that product.";

pub const PRODUCT_UNAVAILABLE: &str = "Sorry, that product is not available.";

pub const ASK_WHICH_PRODUCT: &str = "Could you tell me which product you're referring to?";

pub const NON_ENGLISH_NOTICE_SUFFIX: &str = "At the moment, I can only understand \
     <b>English</b>.<br>If you can, please try again in English 😊";

pub fn frustration_buttons() -> Vec<Button> {
    vec![
        Button::new("Help Menu", "help"),
        Button::new("Delivery Info", "delivery"),
        Button::new("Return Policy", "return policy"),
        Button::new("Customer Support", "support"),
    ]
}

pub fn help_buttons() -> Vec<Button> {
    vec![
        Button::new("T-Shirts", "show me t-shirts"),
        Button::new("Hoodies", "show me hoodies"),
        Button::new("Jackets", "show me jackets"),
        Button::new("Shoes", "show me shoes"),
        Button::new("Delivery", "delivery"),
        Button::new("Returns", "return policy"),
        Button::new("Customer Support", "support"),
    ]
}

pub fn support_buttons() -> Vec<Button> {
    vec![
        Button::new("Open Support Page", "open support page"),
        Button::new("Email Support", "email support"),
    ]
}

pub fn occasion_buttons() -> Vec<Button> {
    vec![
        Button::new("Casual", "casual"),
        Button::new("Work", "work"),
        Button::new("Party", "party"),
    ]
}

pub fn weather_buttons() -> Vec<Button> {
    vec![
        Button::new("Cold ❄️", "cold"),
        Button::new("Mild 🙂", "mild"),
        Button::new("Hot ☀️", "hot"),
        Button::new("Rainy 🌧️", "rainy"),
    ]
}

pub fn color_buttons() -> Vec<Button> {
    vec![
        Button::new("No preference", "no"),
        Button::new("Black", "black"),
        Button::new("White", "white"),
        Button::new("Navy", "navy"),
    ]
}

pub fn budget_buttons() -> Vec<Button> {
    vec![Button::new("Open Budget💸", "no")]
}

pub fn outfit_buttons() -> Vec<Button> {
    vec![
        Button::new("Try another outfit", "try another outfit"),
        Button::new("Start new outfit", "build me an outfit"),
    ]
}

pub fn product_menu_buttons() -> Vec<Button> {
    vec![
        Button::new("Fit & sizing", "fit"),
        Button::new("Material & comfort", "material"),
        Button::new("Care instructions", "care"),
        Button::new("What to wear with it", "style"),
        Button::new("Availability (sizes/colours)", "availability"),
    ]
}
