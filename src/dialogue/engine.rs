//! The per-turn dispatcher.
//!
//! One turn flows through a fixed pipeline: frustration short-circuit →
//! conditional spell correction → topic-switch cleanup → the intent
//! cascade. The cascade is an ordered table of (name, handler)
//! pairs evaluated in a fixed loop; the first handler with an opinion
//! produces the reply. Overlapping keyword triggers (e.g. "size" in the
//! product follow-up vs. the generic size lookup) are resolved purely by
//! table order.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use tracing::debug;

use super::context::{ConversationContext, ConversationState, OutfitStep};
use super::format::{format_outfit, format_product_list, product_preview_card};
use super::messages;
use super::reply::Reply;
use crate::catalog::{pluralize, Catalog, Product};
use crate::lexicon::polarity::PolarityLexicon;
use crate::lexicon::{self, Lexicon};
use crate::nlp::frustration::FrustrationClassifier;
use crate::nlp::language::detect_non_english;
use crate::nlp::measurements::{
    clean_measurement_text, looks_like_measurements, parse_height_cm, parse_weight_kg,
    recommend_size,
};
use crate::nlp::normalizer::SpellCorrector;
use crate::nlp::query::parse_product_query;
use crate::outfit::{build_outfit, Occasion, OutfitPreferences, Style, Weather};

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap());
static POSSESSIVE_STORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:store|shop)['’]?s\s+\w+").unwrap());
static WORD_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z\-]+").unwrap());

const TRY_ANOTHER_PHRASES: &[&str] = &[
    "try another outfit", "another outfit", "new outfit", "regen outfit",
];

const PRODUCT_MENU_PHRASES: &[&str] = &["menu", "product help", "about this"];

const OUTFIT_TRIGGERS: &[&str] = &[
    "outfit", "build an outfit", "outfit builder", "outfit idea", "pick an outfit",
    "make an outfit", "create an outfit",
];

const SUPPORT_KEYWORDS: &[&str] = &[
    "support", "customer support", "helpdesk", "contact", "email", "complaint",
    "complain", "human", "agent", "associate",
];

const ALL_PRODUCT_PHRASES: &[&str] = &[
    "show me all", "all products", "everything", "show everything", "show me everything",
    "list all products", "list everything", "list every product", "show every product",
    "provide all products", "provide everything", "provide every product",
];

const STYLE_QUESTION_MARKERS: &[&str] = &["what does", "what is", "meaning of", "what's", "mean"];

/// One message, prepared for routing. The original-case text is consumed by
/// the frustration check before routing; rules only see the corrected form.
struct Turn {
    /// Routing text: lowercased and (usually) spell-corrected.
    text: String,
}

impl Turn {
    fn trimmed(&self) -> &str {
        self.text.trim()
    }

    fn has(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.text.contains(n))
    }
}

type IntentRule = fn(&Engine, &Turn, &mut ConversationContext) -> Option<Reply>;

/// The intent cascade. First matching rule wins; order is the contract.
const INTENT_RULES: &[(&str, IntentRule)] = &[
    ("try-another-outfit", Engine::rule_try_another_outfit),
    ("support-command", Engine::rule_support_command),
    ("greeting", Engine::rule_greeting),
    ("about-bot", Engine::rule_about_bot),
    ("about-store", Engine::rule_about_store),
    ("product-menu", Engine::rule_product_menu),
    ("size-helper", Engine::rule_size_helper),
    ("product-followup", Engine::rule_product_followup),
    ("quick-actions", Engine::rule_quick_actions),
    ("help-menu", Engine::rule_help_menu),
    ("support-keywords", Engine::rule_support_keywords),
    ("style-glossary", Engine::rule_style_glossary),
    ("outfit-adjustment", Engine::rule_outfit_adjustment),
    ("outfit-entry", Engine::rule_outfit_entry),
    ("outfit-flow", Engine::rule_outfit_flow),
    ("language-notice", Engine::rule_language_notice),
    ("store-info", Engine::rule_store_info),
    ("product-name-exact", Engine::rule_product_name_exact),
    ("product-search", Engine::rule_product_search),
    ("color-followup", Engine::rule_color_followup),
    ("size-followup", Engine::rule_size_followup),
    ("price-followup", Engine::rule_price_followup),
    ("stock-followup", Engine::rule_stock_followup),
    ("product-name-loose", Engine::rule_product_name_loose),
    ("category-mention", Engine::rule_category_mention),
    ("deictic-reference", Engine::rule_deictic_reference),
];

/// The conversational core: owns the catalog-derived vocabularies, the
/// spell corrector, the frustration classifier and the outfit RNG, and
/// turns one message plus a conversation context into a reply.
pub struct Engine {
    catalog: Arc<Catalog>,
    lexicon: Lexicon,
    corrector: SpellCorrector,
    classifier: FrustrationClassifier,
    rng: Mutex<StdRng>,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_resources(catalog, None, None)
    }

    /// Build an engine with optional external resources: a frequency
    /// dictionary override and a polarity lexicon. Both are fail-soft.
    pub fn with_resources(
        catalog: Arc<Catalog>,
        dictionary_path: Option<&Path>,
        polarity_path: Option<&Path>,
    ) -> Self {
        let lexicon = Lexicon::from_catalog(&catalog);
        let corrector = SpellCorrector::from_catalog(&catalog, dictionary_path);
        let classifier =
            FrustrationClassifier::new(PolarityLexicon::load_or_default(polarity_path));
        Self {
            catalog,
            lexicon,
            corrector,
            classifier,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed the outfit RNG, making selections reproducible.
    pub fn with_rng_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Process one turn: mutates `ctx` and returns the reply.
    pub fn reply(&self, ctx: &mut ConversationContext, input: &str) -> Reply {
        let raw = input.trim().to_string();
        let raw_lower = raw.to_lowercase();

        // Frustration short-circuit, suspended while the outfit flow owns
        // the turn. The classifier sees the original-case message.
        if !ctx.is_building_outfit() && self.classifier.is_frustrated(&raw) {
            ctx.last_intent = None;
            return Reply::with_buttons(
                messages::FRUSTRATION_APOLOGY,
                messages::frustration_buttons(),
            );
        }

        // Spell correction is skipped while measurements are pending, for
        // measurement-looking text, and for non-ASCII input.
        let skip_correction =
            matches!(ctx.state, ConversationState::AwaitingMeasurements { .. })
                || looks_like_measurements(&clean_measurement_text(&raw_lower))
                || !raw.is_ascii();
        let text = if skip_correction {
            raw_lower
        } else {
            let corrected = self.corrector.correct(&raw);
            if corrected != raw_lower {
                debug!(%corrected, "spell-corrected input");
            }
            corrected
        };
        let turn = Turn { text };

        // Topic switch: outfit talk leaves any product-scoped flow.
        if turn.has("outfit") {
            ctx.clear_product_context();
        }

        for (name, rule) in INTENT_RULES {
            if let Some(reply) = rule(self, &turn, ctx) {
                debug!(rule = name, "intent matched");
                return reply;
            }
        }

        Reply::text(messages::FALLBACK)
    }

    fn active_product(&self, ctx: &ConversationContext) -> Option<&Product> {
        ctx.active_product_id.and_then(|id| self.catalog.by_id(id))
    }

    /// Rebuild an outfit for `prefs`, avoiding the previous outfit's items,
    /// and store it as the new last outfit.
    fn rebuild_outfit(&self, ctx: &mut ConversationContext, prefs: &OutfitPreferences) -> Reply {
        let avoid = ctx
            .last_outfit
            .as_ref()
            .map(|o| o.item_names())
            .unwrap_or_default();
        let outfit = {
            let mut rng = self.rng.lock();
            build_outfit(&self.catalog, prefs, &avoid, &mut *rng)
        };
        let html = format_outfit(&outfit, prefs);
        ctx.last_outfit = Some(outfit);
        Reply::with_buttons(html, messages::outfit_buttons())
    }

    // -----------------------------------------------------------------
    // Catalog lookup lines (LookupMiss renders a "not found" message)
    // -----------------------------------------------------------------

    fn product_price_line(&self, name: &str) -> String {
        match self.catalog.by_name_substring(name) {
            Some(p) => format!("The price of {} is £{:.2}.", p.name, p.price),
            None => messages::PRODUCT_NOT_FOUND.to_string(),
        }
    }

    fn product_stock_line(&self, name: &str) -> String {
        match self.catalog.by_name_substring(name) {
            Some(p) => format!("We currently have {} of {} in stock.", p.stock, p.name),
            None => messages::PRODUCT_UNAVAILABLE.to_string(),
        }
    }

    fn product_sizes_line(&self, name: &str) -> String {
        match self.catalog.by_name_substring(name) {
            Some(p) => format!(
                "{} is available in the following sizes: {}.",
                p.name,
                p.sizes.join(", ")
            ),
            None => "Sorry, we don't have that product.".to_string(),
        }
    }

    fn product_colors_line(&self, name: &str) -> String {
        match self.catalog.by_name_substring(name) {
            Some(p) => format!(
                "{} comes in the following colors: {}.",
                p.name,
                p.colors.join(", ")
            ),
            None => messages::PRODUCT_UNAVAILABLE.to_string(),
        }
    }

    // -----------------------------------------------------------------
    // Intent rules, in cascade order
    // -----------------------------------------------------------------

    fn rule_try_another_outfit(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !TRY_ANOTHER_PHRASES.contains(&turn.trimmed()) {
            return None;
        }
        let Some(prefs) = ctx.last_outfit_prefs.clone() else {
            return Some(Reply::text(messages::NO_LAST_OUTFIT));
        };
        Some(self.rebuild_outfit(ctx, &prefs))
    }

    fn rule_support_command(&self, turn: &Turn, _ctx: &mut ConversationContext) -> Option<Reply> {
        (turn.trimmed() == "/support").then(|| Reply::text(messages::SUPPORT_INFO))
    }

    fn rule_greeting(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !lexicon::GREETINGS_EXACT.contains(&turn.trimmed()) {
            return None;
        }
        ctx.clear_product_context();
        ctx.last_intent = None;
        Some(Reply::text(messages::GREETING))
    }

    fn rule_about_bot(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let t = turn.trimmed();
        let matched = lexicon::ABOUT_BOT_PHRASES
            .iter()
            .any(|p| t == *p || t.starts_with(&format!("{p} ")));
        if !matched {
            return None;
        }
        ctx.last_intent = None;
        Some(Reply::text(messages::ABOUT_BOT))
    }

    fn rule_about_store(&self, turn: &Turn, _ctx: &mut ConversationContext) -> Option<Reply> {
        is_store_about_question(&turn.text).then(|| Reply::text(messages::ABOUT_STORE))
    }

    fn rule_product_menu(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let product = self.active_product(ctx)?;
        if !PRODUCT_MENU_PHRASES.contains(&turn.trimmed()) {
            return None;
        }
        Some(Reply::with_buttons(
            format!("Sure! Ask me about <b>{}</b> 👇", product.name),
            messages::product_menu_buttons(),
        ))
    }

    /// The measurement sub-flow. A non-measurement turn silently clears the
    /// pending request and falls through to normal routing; partial
    /// measurements stick until both quantities arrive.
    fn rule_size_helper(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let (product_id, prev_height, prev_weight) = match ctx.state {
            ConversationState::AwaitingMeasurements {
                product_id,
                height_cm,
                weight_kg,
            } => (product_id, height_cm, weight_kg),
            _ => return None,
        };

        let Some(product) = self.catalog.by_id(product_id) else {
            // The product vanished from under the sub-flow; recover by
            // clearing it and routing normally.
            ctx.state = ConversationState::Idle;
            ctx.active_product_id = None;
            return None;
        };

        if !looks_like_measurements(&clean_measurement_text(&turn.text)) {
            ctx.state = ConversationState::Idle;
            ctx.active_product_id = None;
            return None;
        }

        let norm = normalize_measurement_separators(&turn.text);
        let height = parse_height_cm(&norm).or(prev_height);
        let weight = parse_weight_kg(&norm).or(prev_weight);

        match (height, weight) {
            (Some(h), Some(w)) => {
                let recommended = recommend_size(h, w, &product.sizes);
                ctx.state = ConversationState::Idle;
                ctx.active_product_id = None;
                Some(Reply::text(format!(
                    "Based on <b>{h:.0}cm</b> and <b>{w:.0}kg</b>, I'd suggest size \
                     <b>{recommended}</b> ✅<br>(This is a rough guide — if you prefer a \
                     looser fit, consider one size up.)"
                )))
            }
            _ => {
                ctx.state = ConversationState::AwaitingMeasurements {
                    product_id,
                    height_cm: height,
                    weight_kg: weight,
                };
                let mut missing = Vec::new();
                if height.is_none() {
                    missing.push("height (e.g., 181cm / 1.81m / 5'11)");
                }
                if weight.is_none() {
                    missing.push("weight (e.g., 75kg / 165lb)");
                }
                Some(Reply::text(format!(
                    "Could you tell me your {}?",
                    missing.join(" and ")
                )))
            }
        }
    }

    /// Follow-up questions about the active product. The fit/sizing branch
    /// also arms the measurement sub-flow.
    fn rule_product_followup(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let product = self.active_product(ctx)?;

        if turn.has_any(&["fit", "oversized", "slim", "regular", "size", "sizing"]) {
            ctx.state = ConversationState::AwaitingMeasurements {
                product_id: product.id,
                height_cm: None,
                weight_kg: None,
            };
            let fit_text = match &product.fit {
                Some(fit) => format!("<b>{fit}</b>"),
                None => "<b>Not specified</b>".to_string(),
            };
            return Some(Reply::text(format!(
                "<b>{name}</b><br>Fit: {fit_text}<br>Available sizes: {sizes}<br><br>\
                 If you tell me your <b>height</b> and <b>weight</b>, I'll recommend a size \
                 for you 😊<br>Example: <i>177cm 77kg</i> or <i>5'11 165lb</i>",
                name = product.name,
                sizes = product.sizes.join(", "),
            )));
        }

        if turn.has_any(&[
            "material", "fabric", "cotton", "wool", "polyester", "comfortable", "comfort",
        ]) {
            return Some(Reply::text(match &product.material {
                Some(material) => {
                    format!("<b>{}</b> material: <b>{material}</b>.", product.name)
                }
                None => format!(
                    "I don't have material info stored for <b>{}</b> yet.",
                    product.name
                ),
            }));
        }

        if turn.has_any(&["care", "wash", "washing", "machine wash", "dry", "shrink", "iron"]) {
            return Some(Reply::text(match &product.care {
                Some(care) => format!("<b>Care for {}:</b><br>{care}", product.name),
                None => format!(
                    "I don't have care instructions stored for <b>{}</b> yet.",
                    product.name
                ),
            }));
        }

        if turn.has_any(&["wear with", "style", "outfit", "match", "goes with"]) {
            if product.style_tips.is_empty() {
                return Some(Reply::text(format!(
                    "For <b>{}</b>, a safe match is neutral bottoms (black/blue) + simple shoes.",
                    product.name
                )));
            }
            let tips: Vec<String> = product
                .style_tips
                .iter()
                .map(|t| format!("• {t}"))
                .collect();
            return Some(Reply::text(format!(
                "<b>Styling ideas for {}:</b><br>{}",
                product.name,
                tips.join("<br>")
            )));
        }

        if turn.has_any(&["available", "availability", "stock", "colors", "colour", "sizes"]) {
            return Some(Reply::text(format!(
                "<b>{}</b><br>Stock: {}<br>Colours: {}<br>Sizes: {}",
                product.name,
                product.stock,
                product.colors.join(", "),
                product.sizes.join(", ")
            )));
        }

        None
    }

    fn rule_quick_actions(&self, turn: &Turn, _ctx: &mut ConversationContext) -> Option<Reply> {
        match turn.trimmed() {
            "/support" => Some(Reply::text(messages::SUPPORT_INFO)),
            "open support page" => Some(Reply::text(messages::OPEN_SUPPORT_PAGE)),
            "email support" => Some(Reply::text(messages::EMAIL_SUPPORT)),
            _ => None,
        }
    }

    fn rule_help_menu(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !["help", "menu", "/help"].contains(&turn.trimmed()) {
            return None;
        }
        ctx.clear_product_context();
        ctx.last_intent = None;
        Some(Reply::with_buttons(
            messages::HELP_MENU,
            messages::help_buttons(),
        ))
    }

    fn rule_support_keywords(&self, turn: &Turn, _ctx: &mut ConversationContext) -> Option<Reply> {
        turn.has_any(SUPPORT_KEYWORDS).then(|| {
            Reply::with_buttons(messages::SUPPORT_OPTIONS, messages::support_buttons())
        })
    }

    fn rule_style_glossary(&self, turn: &Turn, _ctx: &mut ConversationContext) -> Option<Reply> {
        if !turn.has_any(STYLE_QUESTION_MARKERS)
            || !turn.has_any(&["trendy", "minimal", "bold"])
        {
            return None;
        }
        if turn.has("minimal") {
            return Some(Reply::text(messages::MINIMAL_DEFINITION));
        }
        if turn.has("bold") {
            return Some(Reply::text(messages::BOLD_DEFINITION));
        }
        Some(Reply::text(messages::TRENDY_DEFINITION))
    }

    /// A style word after a finished outfit rebuilds it with that style on
    /// a copy of the last preferences.
    fn rule_outfit_adjustment(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if ctx.last_outfit.is_none() || !turn.has_any(&["minimal", "bold", "trendy"]) {
            return None;
        }
        let mut prefs = ctx.last_outfit_prefs.clone().unwrap_or_default();
        prefs.style = Some(if turn.has("minimal") {
            Style::Minimal
        } else if turn.has("bold") {
            Style::Bold
        } else {
            Style::Trendy
        });
        ctx.last_outfit_prefs = Some(prefs.clone());
        Some(self.rebuild_outfit(ctx, &prefs))
    }

    fn rule_outfit_entry(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !turn.has_any(OUTFIT_TRIGGERS) {
            return None;
        }
        ctx.clear_product_context();
        ctx.state = ConversationState::BuildingOutfit {
            step: OutfitStep::Occasion,
            prefs: OutfitPreferences::default(),
        };
        ctx.last_outfit = None;
        Some(Reply::with_buttons(
            messages::OCCASION_PROMPT,
            messages::occasion_buttons(),
        ))
    }

    /// The slot-filling machine: occasion → weather → colors → budget.
    /// Unrecognized answers re-issue the current prompt.
    fn rule_outfit_flow(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let (step, mut prefs) = match &ctx.state {
            ConversationState::BuildingOutfit { step, prefs } => (*step, prefs.clone()),
            _ => return None,
        };

        match step {
            OutfitStep::Occasion => {
                let occasion = if turn.has("work") {
                    Some(Occasion::Work)
                } else if turn.has("party") {
                    Some(Occasion::Party)
                } else if turn.has("casual") {
                    Some(Occasion::Casual)
                } else {
                    None
                };
                let Some(occasion) = occasion else {
                    return Some(Reply::with_buttons(
                        messages::OCCASION_PROMPT,
                        messages::occasion_buttons(),
                    ));
                };
                prefs.occasion = Some(occasion);
                ctx.state = ConversationState::BuildingOutfit {
                    step: OutfitStep::Weather,
                    prefs,
                };
                Some(Reply::with_buttons(
                    messages::WEATHER_PROMPT,
                    messages::weather_buttons(),
                ))
            }
            OutfitStep::Weather => {
                if !turn.has_any(&["cold", "mild", "hot", "rain", "rainy"]) {
                    return Some(Reply::with_buttons(
                        messages::WEATHER_PROMPT,
                        messages::weather_buttons(),
                    ));
                }
                prefs.weather = Some(if turn.has("cold") {
                    Weather::Cold
                } else if turn.has("hot") {
                    Weather::Hot
                } else if turn.has("rain") {
                    Weather::Rainy
                } else {
                    Weather::Mild
                });
                ctx.state = ConversationState::BuildingOutfit {
                    step: OutfitStep::Colors,
                    prefs,
                };
                Some(Reply::with_buttons(
                    messages::COLORS_PROMPT,
                    messages::color_buttons(),
                ))
            }
            OutfitStep::Colors => {
                prefs.colors = if turn.has("no") || turn.has("any") {
                    Vec::new()
                } else {
                    self.lexicon.colors_in_text(&turn.text, 3)
                };
                ctx.state = ConversationState::BuildingOutfit {
                    step: OutfitStep::Budget,
                    prefs,
                };
                Some(Reply::with_buttons(
                    messages::BUDGET_PROMPT,
                    messages::budget_buttons(),
                ))
            }
            OutfitStep::Budget => {
                prefs.budget = if turn.has("no") || turn.has("any") {
                    None
                } else {
                    NUMBER_RE
                        .captures(&turn.text)
                        .and_then(|c| c[1].parse::<f64>().ok())
                };
                debug!(?prefs, "outfit preferences complete");
                ctx.last_outfit_prefs = Some(prefs.clone());
                ctx.state = ConversationState::Idle;
                Some(self.rebuild_outfit(ctx, &prefs))
            }
        }
    }

    fn rule_language_notice(&self, turn: &Turn, _ctx: &mut ConversationContext) -> Option<Reply> {
        let language = detect_non_english(&turn.text)?;
        Some(Reply::text(format!(
            "I can see you're trying to speak <b>{language}</b> 🌍<br>{}",
            messages::NON_ENGLISH_NOTICE_SUFFIX
        )))
    }

    fn rule_store_info(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if turn.has_any(&["hour", "hours", "time"]) || (turn.has("open") && turn.has("store")) {
            return Some(Reply::text(messages::HOURS));
        }
        if turn.has_any(&["location", "where"]) {
            return Some(Reply::text(messages::LOCATION));
        }
        if turn.has_any(&["delivery", "shipping"]) {
            return Some(Reply::text(messages::DELIVERY));
        }
        if turn.has_any(&["return", "refund"]) {
            return Some(Reply::text(messages::RETURNS));
        }
        if turn.has_any(&["thank", "love you", "awesome", "cool", "cheers", "wow"]) {
            ctx.last_intent = None;
            return Some(Reply::text(messages::THANKS_REPLY));
        }
        if turn.has_any(&["bye", "goodbye", "see you", "take care"]) {
            ctx.last_intent = None;
            return Some(Reply::text(messages::BYE_REPLY));
        }
        if turn.has_any(&["how are you", "what's good", "how is it going"]) {
            ctx.last_intent = None;
            return Some(Reply::text(messages::SMALL_TALK_REPLY));
        }
        None
    }

    /// A product named verbatim (spaces ignored) answers directly, with
    /// per-intent sub-routing for price/stock/sizes/colors.
    fn rule_product_name_exact(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let compact_input = turn.text.replace(' ', "");

        for product in self.catalog.products() {
            if !compact_input.contains(&product.name_compact()) {
                continue;
            }
            ctx.last_product = Some(product.name.clone());
            ctx.last_category = None;
            ctx.last_intent = None;

            if turn.has_any(&["price", "cost"]) {
                return Some(Reply::text(self.product_price_line(&product.name)));
            }
            if turn.has_any(&["stock", "available", "availability", "quantity"]) {
                return Some(Reply::text(self.product_stock_line(&product.name)));
            }
            if turn.has_any(&["size", "sizes", "fit", "sizing"]) {
                return Some(Reply::text(self.product_sizes_line(&product.name)));
            }
            if turn.has_any(&["color", "colour", "colors", "colours"]) {
                return Some(Reply::text(self.product_colors_line(&product.name)));
            }

            let card = product_preview_card(product);
            return Some(Reply::text(format!(
                "You mentioned <b>{}</b>. Would you like to know its price, stock, sizes \
                 or colours?{card}",
                product.name
            )));
        }

        None
    }

    /// Structured search: any parsed filter or a product-request keyword
    /// triggers a filtered listing.
    fn rule_product_search(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let filters = parse_product_query(&turn.text, &self.lexicon);
        let asked =
            turn.has_any(lexicon::PRODUCT_REQUEST_KEYWORDS) || !filters.is_empty();
        if !asked {
            return None;
        }
        debug!(?filters, "parsed product query");

        if turn.has_any(ALL_PRODUCT_PHRASES) {
            return Some(Reply::text(messages::BROWSE_ALL_REDIRECT));
        }

        ctx.active_product_id = None;
        let matched = self.catalog.filter_products(&filters);

        // A request with no usable filters that "matches" the whole catalog
        // is probably about something we do not sell.
        if filters.is_empty() && matched.len() == self.catalog.len() {
            if let Some(keyword) = possible_product_keyword(&turn.text) {
                let known = self.catalog.products().iter().any(|p| {
                    p.name.to_lowercase().contains(&keyword)
                        || p.category.to_lowercase().contains(&keyword)
                });
                if !known {
                    return Some(Reply::text(format!(
                        "Sorry, we don't sell '{keyword}' here. I can help with clothes \
                         like t-shirts, hoodies, jackets, shoes, trousers, socks, and \
                         accessories.😊"
                    )));
                }
            }
        }

        if let Some(category) = &filters.category {
            ctx.last_category = Some(category.clone());
            ctx.last_product = None;
            ctx.last_product_list = matched.iter().map(|p| p.name.clone()).collect();
        }

        let title = match (&filters.category, filters.max_price) {
            (Some(category), Some(max)) => {
                format!("Here are our {category}s under £{max:.0}:")
            }
            (Some(category), None) => format!("Here are our {category}s:"),
            (None, Some(max)) => format!("Products under £{max:.0}:"),
            (None, None) => "Here's what I found:".to_string(),
        };
        Some(Reply::text(format_product_list(&matched, &title)))
    }

    fn rule_color_followup(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !turn.has_any(&["color", "colors", "colour", "colours"]) {
            return None;
        }

        if let Some(name) = ctx.last_product.clone() {
            return Some(Reply::text(self.product_colors_line(&name)));
        }

        for product in self.catalog.products() {
            if turn.has(&product.name.to_lowercase()) {
                ctx.last_product = Some(product.name.clone());
                return Some(Reply::text(self.product_colors_line(&product.name)));
            }
        }

        if let Some(category) = ctx.last_category.clone() {
            let colors: BTreeSet<String> = self
                .catalog
                .search_by_keyword(&category)
                .iter()
                .flat_map(|p| p.colors.iter().map(|c| capitalize(c)))
                .collect();
            let list = colors.into_iter().collect::<Vec<_>>().join(", ");
            return Some(Reply::text(format!(
                "Our {category}s come in these colors: {list}."
            )));
        }

        Some(Reply::text(
            "Which product would you like to know the colours of?",
        ))
    }

    fn rule_size_followup(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !turn.has_any(&["size", "sizes"]) {
            return None;
        }

        if let Some(name) = ctx.last_product.clone() {
            return Some(Reply::text(self.product_sizes_line(&name)));
        }

        for product in self.catalog.products() {
            if turn.has(&product.name.to_lowercase()) {
                ctx.last_product = Some(product.name.clone());
                return Some(Reply::text(self.product_sizes_line(&product.name)));
            }
        }

        if let Some(category) = ctx.last_category.clone() {
            let sizes: BTreeSet<String> = self
                .catalog
                .search_by_keyword(&category)
                .iter()
                .flat_map(|p| p.sizes.iter().map(|s| s.to_uppercase()))
                .collect();
            let list = sizes.into_iter().collect::<Vec<_>>().join(", ");
            return Some(Reply::text(format!(
                "Our {category}s are available in these sizes: {list}."
            )));
        }

        Some(Reply::text(
            "Which product would you like to know the sizes of?",
        ))
    }

    fn rule_price_followup(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !turn.has_any(&["price", "cost"]) {
            return None;
        }

        if let Some(name) = ctx.last_product.clone() {
            ctx.last_intent = None;
            return Some(Reply::text(self.product_price_line(&name)));
        }

        // Remember a product named loosely (even without spaces) so a bare
        // "price" next turn can answer.
        let compact_input = turn.text.replace(' ', "");
        for product in self.catalog.products() {
            let name_lower = product.name.to_lowercase();
            if compact_input.contains(&product.name_compact())
                || name_lower
                    .split_whitespace()
                    .any(|word| compact_input.contains(word))
            {
                ctx.last_product = Some(product.name.clone());
                ctx.last_intent = None;
            }
        }
        ctx.last_intent = Some("price".to_string());

        if let Some(category) = &ctx.last_category {
            return Some(Reply::text(format!(
                "Which {category} would you like to know the price of?"
            )));
        }
        Some(Reply::text("Which product would you like the price for?"))
    }

    fn rule_stock_followup(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        if !turn.has_any(&["stock", "quantity", "available", "availability"]) {
            return None;
        }

        if let Some(name) = ctx.last_product.clone() {
            return Some(Reply::text(self.product_stock_line(&name)));
        }

        for product in self.catalog.products() {
            if turn.has(&product.name.to_lowercase()) {
                ctx.last_product = Some(product.name.clone());
                return Some(Reply::text(self.product_stock_line(&product.name)));
            }
        }

        if let Some(category) = &ctx.last_category {
            return Some(Reply::text(format!(
                "Would you like me to check stock for our {category}s?"
            )));
        }
        Some(Reply::text(
            "Could you tell me which product you'd like me to check stock for?",
        ))
    }

    /// Loose product-name matching: the name and the turn may contain each
    /// other once spaces are dropped.
    fn rule_product_name_loose(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let compact_input = turn.text.replace(' ', "");
        if compact_input.is_empty() {
            return None;
        }

        for product in self.catalog.products() {
            let compact_name = product.name_compact();
            if !(compact_input.contains(&compact_name)
                || compact_name.contains(&compact_input)
                || turn.has(&product.name.to_lowercase()))
            {
                continue;
            }
            ctx.last_product = Some(product.name.clone());
            ctx.last_intent = None;

            if turn.has_any(&["price", "cost"]) {
                return Some(Reply::text(self.product_price_line(&product.name)));
            }

            let card = product_preview_card(product);
            return Some(Reply::text(format!(
                "You mentioned <b>{}</b>. Would you like to know its price, stock, sizes \
                 or colours?<br><br>{card}",
                product.name
            )));
        }

        None
    }

    fn rule_category_mention(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let (_, base) = lexicon::CATEGORY_ALIASES
            .iter()
            .find(|(alias, _)| turn.has(alias))?;

        let found = self.catalog.search_by_keyword(base);
        if found.is_empty() {
            return Some(Reply::text(format!(
                "Sorry, we don't have any {} in stock right now.",
                pluralize(base)
            )));
        }

        ctx.last_category = Some(base.to_string());
        ctx.last_product = None;
        ctx.last_product_list = found.iter().map(|p| p.name.clone()).collect();
        ctx.last_intent = None;

        let mut response = format!("<b>Here are our {}:</b><br>", pluralize(base));
        for product in &found {
            response.push_str(&format!("• {} (£{:.2})<br>", product.name, product.price));
        }
        Some(Reply::text(response))
    }

    /// "That one" / a bare color adjective, resolved against the last
    /// listing, with per-intent sub-routing.
    fn rule_deictic_reference(&self, turn: &Turn, ctx: &mut ConversationContext) -> Option<Reply> {
        let deictic = turn.has("one")
            || turn.has("that")
            || lexicon::DEICTIC_ADJECTIVES.iter().any(|a| turn.has(a));
        if !deictic {
            return None;
        }

        if ctx.last_product_list.is_empty() {
            return Some(Reply::text(messages::ASK_WHICH_PRODUCT));
        }

        let words: Vec<String> = turn
            .text
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .collect();

        let chosen = ctx
            .last_product_list
            .iter()
            .find(|name| {
                let lower = name.to_lowercase();
                let compact = lower.replace(' ', "");
                words.iter().any(|w| compact.contains(w) || lower.contains(w))
            })
            .cloned();

        let Some(name) = chosen else {
            return Some(Reply::text(messages::ASK_WHICH_PRODUCT));
        };
        ctx.last_product = Some(name.clone());

        if turn.has_any(&["price", "cost"]) {
            return Some(Reply::text(self.product_price_line(&name)));
        }
        if turn.has_any(&["stock", "quantity", "available"]) {
            return Some(Reply::text(self.product_stock_line(&name)));
        }
        if turn.has_any(&["size", "sizes"]) {
            return Some(Reply::text(self.product_sizes_line(&name)));
        }
        if turn.has_any(&["color", "colour", "colors", "colours"]) {
            return Some(Reply::text(self.product_colors_line(&name)));
        }

        Some(Reply::text(format!(
            "Are you referring to the {name}? Would you like to know its price, stock, \
             or colours?"
        )))
    }
}

// ---------------------------------------------------------------------
// Free helpers
// ---------------------------------------------------------------------

fn is_store_about_question(text: &str) -> bool {
    const ABOUT_INTENT: &[&str] = &[
        "what is this", "what's this", "what is this store", "what's this store",
        "tell me about", "about this store", "about the store", "what do you sell",
        "what do you sell here", "what is your store", "who are you", "what are you",
    ];
    const STORE_MENTIONS: &[&str] = &["store", "shop", "website", "site", "you"];
    const PRODUCTY: &[&str] = &[
        "show", "find", "browse", "hoodie", "hoodies", "jacket", "jackets", "t-shirt",
        "tshirts", "shoes", "socks", "accessories", "category", "under", "size", "sizes",
        "price", "stock",
    ];

    let about = ABOUT_INTENT.iter().any(|p| text.contains(p));
    let mentions_store = STORE_MENTIONS.iter().any(|w| text.contains(w));
    let producty = PRODUCTY.iter().any(|w| text.contains(w));
    let possessive = POSSESSIVE_STORE_RE.is_match(text);

    about && mentions_store && !producty && !possessive
}

/// First non-noise word of a request, used to name what we do not sell.
fn possible_product_keyword(text: &str) -> Option<String> {
    WORD_TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .find(|w| !lexicon::NOISE_WORDS.contains(&w.as_str()))
}

fn normalize_measurement_separators(text: &str) -> String {
    let mut t = text.to_string();
    for ch in [',', '|', '\\', '/', '+', '-'] {
        t = t.replace(ch, " ");
    }
    t.replace(" and ", " ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
