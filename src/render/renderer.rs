//! Section dispatch: maps section ids to units, with a placeholder for ids
//! nothing is registered for.

use crate::render::{units, Node, RenderContext};
use crate::sections::{SectionEntry, SectionKind};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::warn;

pub type RenderFn = Box<dyn Fn(&SectionEntry, &RenderContext<'_>) -> Node + Send + Sync>;

/// Wraps a typed unit: the entry's `content` map is decoded into `C` before
/// the unit runs.
pub fn unit<C>(render: fn(&SectionEntry, &C, &RenderContext<'_>) -> Node) -> RenderFn
where
    C: DeserializeOwned + Default + 'static,
{
    Box::new(move |entry: &SectionEntry, ctx: &RenderContext<'_>| {
        let content: C = entry.content_as();
        render(entry, &content, ctx)
    })
}

pub struct SectionRenderer {
    units: HashMap<String, RenderFn>,
}

impl Default for SectionRenderer {
    fn default() -> Self {
        Self::with_builtin_units()
    }
}

impl SectionRenderer {
    /// Renderer with nothing registered; every section renders as a placeholder.
    pub fn empty() -> Self {
        Self {
            units: HashMap::new(),
        }
    }

    /// Renderer with a unit for every registry kind.
    pub fn with_builtin_units() -> Self {
        let mut renderer = Self::empty();
        for kind in SectionKind::ALL {
            renderer.register(kind.id(), builtin(kind));
        }
        renderer
    }

    /// Adds or replaces the unit for `id`.
    pub fn register(&mut self, id: &str, render: RenderFn) {
        self.units.insert(id.to_string(), render);
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    /// Renders enabled sections in ascending `order`. Disabled sections
    /// produce no node at all; unknown ids produce a placeholder.
    pub fn render(&self, sections: &[SectionEntry], ctx: &RenderContext<'_>) -> Vec<Node> {
        let mut ordered: Vec<&SectionEntry> = sections.iter().filter(|s| s.enabled).collect();
        ordered.sort_by_key(|s| s.order);

        ordered
            .into_iter()
            .map(|entry| match self.units.get(&entry.id) {
                Some(render) => render(entry, ctx),
                None => {
                    warn!(
                        section = %entry.id,
                        name = %entry.name,
                        "no unit for section, rendering placeholder"
                    );
                    units::coming_soon(entry)
                }
            })
            .collect()
    }
}

fn builtin(kind: SectionKind) -> RenderFn {
    match kind {
        SectionKind::Header => unit(units::header),
        SectionKind::Hero => unit(units::hero),
        SectionKind::Featured => unit(units::featured),
        SectionKind::Categories => unit(units::categories),
        SectionKind::Promos => unit(units::promos),
        SectionKind::Menu => unit(units::menu),
        SectionKind::About => unit(units::about),
        SectionKind::Services => unit(units::services),
        SectionKind::HowItWorks => unit(units::how_it_works),
        SectionKind::Reviews => unit(units::reviews),
        SectionKind::Gallery => unit(units::gallery),
        SectionKind::Cta => unit(units::cta),
        SectionKind::Newsletter => unit(units::newsletter),
        SectionKind::Faq => unit(units::faq),
        SectionKind::Team => unit(units::team),
        SectionKind::Contact => unit(units::contact),
        SectionKind::Stats => unit(units::stats),
        SectionKind::Offers => unit(units::offers),
        SectionKind::Delivery => unit(units::delivery),
        SectionKind::Payment => unit(units::payment),
        SectionKind::Partners => unit(units::partners),
        SectionKind::Footer => unit(units::footer),
    }
}
