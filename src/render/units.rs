//! Presentational units, one per section kind.
//!
//! Each unit receives the entry (for id, name and settings), its decoded
//! content, and the shared context, and returns the section's root node.

use crate::catalog::MenuItem;
use crate::render::content::*;
use crate::render::{Action, Node, RenderContext};
use crate::sections::SectionEntry;
use chrono::{Datelike, Utc};

const FEATURED_LIMIT: usize = 6;

fn section_root(entry: &SectionEntry) -> Node {
    Node::element("section")
        .attr("data-section", entry.id.clone())
        .class(&format!("section section-{}", entry.id))
}

fn heading(title: Option<&String>, fallback: &str) -> Node {
    Node::text_element("h2", title.cloned().unwrap_or_else(|| fallback.to_string()))
}

fn columns(entry: &SectionEntry, default: u8) -> String {
    entry
        .settings_as::<LayoutSettings>()
        .columns
        .filter(|c| *c > 0)
        .unwrap_or(default)
        .to_string()
}

fn item_card(item: &MenuItem, show_image: bool) -> Node {
    let mut card = Node::element("article")
        .class("item-card")
        .attr("data-item", item.id.clone());
    if show_image {
        if let Some(image) = &item.image {
            card = card.child(
                Node::element("img")
                    .attr("src", image.clone())
                    .attr("alt", item.name.clone()),
            );
        }
    }
    card.child(Node::text_element("h3", item.name.clone()))
        .child(Node::text_element("p", item.description.clone()))
        .child(Node::text_element("span", item.display_price()).class("price"))
        .child(
            Node::text_element("button", "Add to cart").on_click(Action::AddToCart {
                item_id: item.id.clone(),
            }),
        )
}

fn card_list(
    title: Option<&String>,
    fallback: &str,
    items: &[CardItem],
    entry: &SectionEntry,
) -> Node {
    let cards = items.iter().map(|card| {
        let mut node = Node::element("div")
            .class("card")
            .child(Node::text_element("h3", card.title.clone()))
            .child(Node::text_element("p", card.description.clone()));
        if let Some(code) = &card.code {
            node = node.child(Node::text_element("code", code.clone()));
        }
        node
    });
    section_root(entry)
        .child(heading(title, fallback))
        .child(Node::element("div").class("cards").children(cards))
}

pub fn header(entry: &SectionEntry, content: &HeaderContent, ctx: &RenderContext<'_>) -> Node {
    let mut root = section_root(entry).child(ctx.header_node.clone());
    if let Some(tagline) = &content.tagline {
        root = root.child(Node::text_element("p", tagline.clone()).class("tagline"));
    }
    root
}

pub fn hero(entry: &SectionEntry, content: &HeroContent, ctx: &RenderContext<'_>) -> Node {
    let title = content
        .title
        .clone()
        .unwrap_or_else(|| format!("Welcome to {}", ctx.vendor.name));
    let mut root = section_root(entry);
    if let Some(image) = &content.background_image {
        root = root.attr("data-background", image.clone());
    }
    if entry.settings_as::<LayoutSettings>().autoplay {
        root = root.attr("data-autoplay", "true");
    }
    root.child(Node::text_element("h1", title))
        .child(Node::text_element(
            "p",
            content
                .subtitle
                .clone()
                .unwrap_or_else(|| "Fresh food, made to order".to_string()),
        ))
        .child(Node::text_element(
            "a",
            content
                .cta_label
                .clone()
                .unwrap_or_else(|| "Order now".to_string()),
        )
        .attr("href", "#menu"))
}

pub fn featured(entry: &SectionEntry, content: &TitledContent, ctx: &RenderContext<'_>) -> Node {
    let settings = entry.settings_as::<LayoutSettings>();
    let limit = settings.limit.unwrap_or(FEATURED_LIMIT);
    let show_images = settings.show_images.unwrap_or(true);
    let cards = ctx
        .menu_items
        .iter()
        .filter(|item| item.available)
        .take(limit)
        .map(|item| item_card(item, show_images));

    section_root(entry)
        .child(heading(content.title.as_ref(), "Featured"))
        .child(
            Node::element("div")
                .class("grid")
                .attr("data-columns", columns(entry, 3))
                .children(cards),
        )
}

pub fn categories(entry: &SectionEntry, content: &TitledContent, ctx: &RenderContext<'_>) -> Node {
    let pill = |label: &str, id: Option<&str>| {
        let active = ctx.selected_category == id;
        Node::text_element("button", label.to_string())
            .class(if active { "pill active" } else { "pill" })
            .on_click(Action::SelectCategory {
                category_id: id.map(str::to_string),
            })
    };

    let mut pills = vec![pill("All", None)];
    pills.extend(
        ctx.categories
            .iter()
            .map(|category| pill(category.name.as_str(), Some(category.id.as_str()))),
    );

    section_root(entry)
        .child(heading(content.title.as_ref(), "Categories"))
        .child(Node::element("nav").class("pills").children(pills))
}

pub fn promos(entry: &SectionEntry, content: &CardListContent, _ctx: &RenderContext<'_>) -> Node {
    if content.items.is_empty() {
        return section_root(entry)
            .child(heading(content.title.as_ref(), "Promotions"))
            .child(Node::text_element("p", "Check back soon for new promotions"));
    }
    card_list(content.title.as_ref(), "Promotions", &content.items, entry)
}

pub fn menu(entry: &SectionEntry, content: &TitledContent, ctx: &RenderContext<'_>) -> Node {
    let show_images = entry
        .settings_as::<LayoutSettings>()
        .show_images
        .unwrap_or(true);
    let items: Vec<Node> = ctx
        .visible_items()
        .map(|item| item_card(item, show_images))
        .collect();

    let list = if items.is_empty() {
        Node::text_element("p", "No items in this category yet").class("empty")
    } else {
        Node::element("div")
            .class("grid")
            .attr("data-columns", columns(entry, 2))
            .children(items)
    };

    section_root(entry)
        .attr("id", "menu")
        .child(heading(content.title.as_ref(), "Our Menu"))
        .child(list)
        .child(ctx.cart_node.clone())
}

pub fn about(entry: &SectionEntry, content: &AboutContent, ctx: &RenderContext<'_>) -> Node {
    let mut root = section_root(entry)
        .child(heading(content.title.as_ref(), &format!("About {}", ctx.vendor.name)))
        .child(Node::text_element(
            "p",
            content
                .body
                .clone()
                .unwrap_or_else(|| "We cook everything fresh, every day.".to_string()),
        ));
    if let Some(image) = &content.image {
        root = root.child(Node::element("img").attr("src", image.clone()));
    }
    root
}

pub fn services(entry: &SectionEntry, content: &CardListContent, _ctx: &RenderContext<'_>) -> Node {
    if content.items.is_empty() {
        let defaults = [
            ("Dine-in", "Grab a table and enjoy"),
            ("Takeaway", "Ready when you are"),
            ("Catering", "Feeding your whole team"),
        ]
        .map(|(title, description)| CardItem {
            title: title.to_string(),
            description: description.to_string(),
            code: None,
        });
        return card_list(content.title.as_ref(), "Services", &defaults, entry);
    }
    card_list(content.title.as_ref(), "Services", &content.items, entry)
}

pub fn how_it_works(
    entry: &SectionEntry,
    content: &StepsContent,
    _ctx: &RenderContext<'_>,
) -> Node {
    let steps: Vec<String> = if content.steps.is_empty() {
        ["Browse the menu", "Add to your cart", "Check out", "Enjoy your meal"]
            .map(str::to_string)
            .to_vec()
    } else {
        content.steps.clone()
    };

    section_root(entry)
        .child(heading(content.title.as_ref(), "How It Works"))
        .child(
            Node::element("ol")
                .children(steps.into_iter().map(|step| Node::text_element("li", step))),
        )
}

pub fn reviews(entry: &SectionEntry, content: &ReviewsContent, _ctx: &RenderContext<'_>) -> Node {
    let settings = entry.settings_as::<LayoutSettings>();
    let limit = settings.limit.unwrap_or(usize::MAX);
    let mut root = section_root(entry).child(heading(content.title.as_ref(), "What Customers Say"));
    if settings.autoplay {
        root = root.attr("data-autoplay", "true");
    }

    if content.reviews.is_empty() {
        return root.child(Node::text_element("p", "Be the first to leave a review"));
    }

    let quotes = content.reviews.iter().take(limit).map(|review| {
        let stars = "★".repeat(review.rating.min(5) as usize);
        Node::element("blockquote")
            .child(Node::text_element("p", review.text.clone()))
            .child(Node::text_element("cite", format!("{} {}", review.author, stars)))
    });
    root.child(Node::element("div").class("reviews").children(quotes))
}

pub fn gallery(entry: &SectionEntry, content: &GalleryContent, ctx: &RenderContext<'_>) -> Node {
    let mut images = content.images.clone();
    if images.is_empty() {
        images = ctx
            .menu_items
            .iter()
            .filter_map(|item| item.image.clone())
            .collect();
    }

    section_root(entry)
        .child(heading(content.title.as_ref(), "Gallery"))
        .child(
            Node::element("div")
                .class("gallery")
                .attr("data-columns", columns(entry, 4))
                .children(
                    images
                        .into_iter()
                        .map(|src| Node::element("img").attr("src", src)),
                ),
        )
}

pub fn cta(entry: &SectionEntry, content: &CtaContent, _ctx: &RenderContext<'_>) -> Node {
    section_root(entry)
        .child(heading(content.title.as_ref(), "Hungry?"))
        .child(Node::text_element(
            "p",
            content
                .subtitle
                .clone()
                .unwrap_or_else(|| "Order online in under a minute".to_string()),
        ))
        .child(
            Node::text_element(
                "a",
                content
                    .button_label
                    .clone()
                    .unwrap_or_else(|| "Start your order".to_string()),
            )
            .attr("href", "#menu"),
        )
}

pub fn newsletter(
    entry: &SectionEntry,
    content: &NewsletterContent,
    _ctx: &RenderContext<'_>,
) -> Node {
    section_root(entry)
        .child(heading(content.title.as_ref(), "Stay in the loop"))
        .child(Node::text_element(
            "p",
            content
                .subtitle
                .clone()
                .unwrap_or_else(|| "Deals and new dishes, straight to your inbox".to_string()),
        ))
        .child(
            Node::element("form")
                .child(
                    Node::element("input").attr("type", "email").attr(
                        "placeholder",
                        content
                            .placeholder
                            .clone()
                            .unwrap_or_else(|| "you@example.com".to_string()),
                    ),
                )
                .child(Node::text_element(
                    "button",
                    content
                        .button_label
                        .clone()
                        .unwrap_or_else(|| "Subscribe".to_string()),
                )),
        )
}

pub fn faq(entry: &SectionEntry, content: &FaqContent, _ctx: &RenderContext<'_>) -> Node {
    let items = content.items.iter().map(|item| {
        Node::element("details")
            .child(Node::text_element("summary", item.question.clone()))
            .child(Node::text_element("p", item.answer.clone()))
    });
    section_root(entry)
        .child(heading(content.title.as_ref(), "Frequently Asked Questions"))
        .children(items)
}

pub fn team(entry: &SectionEntry, content: &TeamContent, _ctx: &RenderContext<'_>) -> Node {
    let members = content.members.iter().map(|member| {
        Node::element("div")
            .class("member")
            .child(Node::text_element("h3", member.name.clone()))
            .child(Node::text_element("p", member.role.clone()))
    });
    section_root(entry)
        .child(heading(content.title.as_ref(), "Meet the Team"))
        .child(
            Node::element("div")
                .class("team")
                .attr("data-columns", columns(entry, 3))
                .children(members),
        )
}

pub fn contact(entry: &SectionEntry, content: &ContactContent, ctx: &RenderContext<'_>) -> Node {
    let email = content
        .email
        .clone()
        .filter(|e| !e.is_empty())
        .or_else(|| Some(ctx.vendor.email.clone()).filter(|e| !e.is_empty()));

    let rows = [
        ("Phone", content.phone.clone()),
        ("Email", email),
        ("Address", content.address.clone()),
        ("Hours", content.hours.clone()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| Node::text_element("li", format!("{label}: {v}"))));

    section_root(entry)
        .child(heading(content.title.as_ref(), "Contact Us"))
        .child(Node::element("ul").children(rows))
}

pub fn stats(entry: &SectionEntry, content: &StatsContent, ctx: &RenderContext<'_>) -> Node {
    let items: Vec<Stat> = if content.items.is_empty() {
        vec![
            Stat {
                label: "Dishes".to_string(),
                value: ctx.menu_items.len().to_string(),
            },
            Stat {
                label: "Categories".to_string(),
                value: ctx.categories.len().to_string(),
            },
        ]
    } else {
        content.items.clone()
    };

    section_root(entry).child(
        Node::element("dl")
            .attr("data-columns", columns(entry, 4))
            .children(items.into_iter().flat_map(|stat| {
                [
                    Node::text_element("dt", stat.label),
                    Node::text_element("dd", stat.value),
                ]
            })),
    )
}

pub fn offers(entry: &SectionEntry, content: &CardListContent, _ctx: &RenderContext<'_>) -> Node {
    if content.items.is_empty() {
        return section_root(entry)
            .child(heading(content.title.as_ref(), "Special Offers"))
            .child(Node::text_element("p", "No offers running right now"));
    }
    card_list(content.title.as_ref(), "Special Offers", &content.items, entry)
}

pub fn delivery(entry: &SectionEntry, content: &DeliveryContent, _ctx: &RenderContext<'_>) -> Node {
    let mut facts = Vec::new();
    if let Some(radius) = content.radius_km {
        facts.push(format!("We deliver within {radius} km"));
    }
    match content.fee_cents {
        Some(0) | None => facts.push("Free delivery".to_string()),
        Some(fee) => facts.push(format!("Delivery fee: {}.{:02}", fee / 100, fee % 100)),
    }
    if let Some(eta) = content.eta_minutes {
        facts.push(format!("Arrives in about {eta} minutes"));
    }

    section_root(entry)
        .child(heading(content.title.as_ref(), "Delivery"))
        .child(
            Node::element("ul")
                .children(facts.into_iter().map(|fact| Node::text_element("li", fact))),
        )
}

pub fn payment(entry: &SectionEntry, content: &ListContent, _ctx: &RenderContext<'_>) -> Node {
    let methods = if content.items.is_empty() {
        vec!["Cash".to_string(), "Card".to_string()]
    } else {
        content.items.clone()
    };
    section_root(entry)
        .child(heading(content.title.as_ref(), "We Accept"))
        .child(
            Node::element("ul")
                .children(methods.into_iter().map(|m| Node::text_element("li", m))),
        )
}

pub fn partners(entry: &SectionEntry, content: &ListContent, _ctx: &RenderContext<'_>) -> Node {
    section_root(entry)
        .child(heading(content.title.as_ref(), "Our Partners"))
        .child(
            Node::element("ul")
                .class("partners")
                .children(content.items.iter().map(|p| Node::text_element("li", p.clone()))),
        )
}

pub fn footer(entry: &SectionEntry, content: &FooterContent, ctx: &RenderContext<'_>) -> Node {
    let copyright = content
        .copyright
        .clone()
        .unwrap_or_else(|| format!("© {} {}", Utc::now().year(), ctx.vendor.name));

    section_root(entry)
        .child(
            Node::element("nav").children(
                content
                    .links
                    .iter()
                    .map(|link| Node::text_element("a", link.clone()).attr("href", link.clone())),
            ),
        )
        .child(Node::text_element("small", copyright))
}

/// Stand-in for ids this build has no unit for.
pub fn coming_soon(entry: &SectionEntry) -> Node {
    section_root(entry)
        .class(&format!("section section-placeholder section-{}", entry.id))
        .attr("data-placeholder", "true")
        .child(Node::text_element("h2", entry.name.clone()))
        .child(Node::text_element(
            "p",
            format!("Section '{}' is coming soon", entry.id),
        ))
}
