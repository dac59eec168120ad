//! Public storefront tab for `/store/{slug}`.
//!
//! The page keeps its last render and re-renders whenever the tab's bus
//! signals a vendor change, always re-reading the vendor and catalog first.

use crate::catalog::{Category, MenuItem};
use crate::engine::Services;
use crate::error::Result;
use crate::render::{cart_node, header_node, to_html, Action, Cart, Node, RenderContext};
use crate::sections::TemplateId;
use crate::sync::{Subscription, SyncBus};
use crate::vendor::Vendor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Default)]
struct PageState {
    slug: String,
    preview: Option<String>,
    vendor: Option<Vendor>,
    menu_items: Vec<MenuItem>,
    categories: Vec<Category>,
    selected_category: Option<String>,
    cart: Cart,
    template: Option<TemplateId>,
    nodes: Vec<Node>,
}

struct Shared {
    services: Services,
    state: Mutex<PageState>,
    revision: watch::Sender<u64>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-reads vendor and catalog, then renders.
    fn reload(&self) -> Result<()> {
        let mut state = self.state();
        let vendor = self.services.vendors.get_vendor_by_slug(&state.slug)?;
        match &vendor {
            Some(vendor) => {
                state.menu_items = self.services.catalog.menu_items(&vendor.id)?;
                state.categories = self.services.catalog.categories(&vendor.id)?;
            }
            None => {
                state.menu_items.clear();
                state.categories.clear();
            }
        }
        state.vendor = vendor;
        self.render(&mut state);
        Ok(())
    }

    fn render(&self, state: &mut PageState) {
        let Some(vendor) = &state.vendor else {
            state.template = None;
            state.nodes = vec![not_found(&state.slug)];
            self.bump();
            return;
        };

        let active = self
            .services
            .resolver
            .resolve_active_config(vendor, state.preview.as_deref());
        let nodes = {
            let mut ctx = RenderContext::new(vendor, &state.menu_items, &state.categories);
            ctx.selected_category = state.selected_category.as_deref();
            ctx.cart_count = state.cart.count();
            ctx.cart_node = cart_node(&state.cart);
            ctx.header_node = header_node(vendor, state.cart.count());
            self.services.renderer.render(&active.sections, &ctx)
        };
        debug!(
            slug = %state.slug,
            template = %active.template,
            sections = nodes.len(),
            "storefront rendered"
        );
        state.nodes = nodes;
        state.template = Some(active.template);
        self.bump();
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

pub struct StorefrontPage {
    shared: Arc<Shared>,
    _subscription: Subscription,
}

impl StorefrontPage {
    /// Loads and renders the storefront for `slug`, then keeps it current
    /// with every signal raised on `bus`. An unknown slug renders a
    /// not-found page rather than failing.
    pub fn open(
        services: Services,
        bus: &SyncBus,
        slug: &str,
        preview: Option<&str>,
    ) -> Result<Self> {
        let (revision, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            services,
            state: Mutex::new(PageState {
                slug: slug.to_string(),
                preview: preview
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
                ..PageState::default()
            }),
            revision,
        });
        shared.reload()?;

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let subscription = bus.on_vendor_updated(move |signal| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            debug!(source = ?signal.source, "storefront refreshing");
            if let Err(err) = shared.reload() {
                warn!(%err, "storefront refresh failed, keeping last render");
            }
        });

        Ok(Self {
            shared,
            _subscription: subscription,
        })
    }

    pub fn reload(&self) -> Result<()> {
        self.shared.reload()
    }

    pub fn is_found(&self) -> bool {
        self.shared.state().vendor.is_some()
    }

    pub fn vendor(&self) -> Option<Vendor> {
        self.shared.state().vendor.clone()
    }

    pub fn template(&self) -> Option<TemplateId> {
        self.shared.state().template.clone()
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.shared.state().nodes.clone()
    }

    pub fn html(&self) -> String {
        to_html(&self.shared.state().nodes)
    }

    /// Ids of the rendered sections, top to bottom.
    pub fn section_ids(&self) -> Vec<String> {
        self.shared
            .state()
            .nodes
            .iter()
            .filter_map(|n| n.section_id().map(str::to_string))
            .collect()
    }

    pub fn selected_category(&self) -> Option<String> {
        self.shared.state().selected_category.clone()
    }

    pub fn cart(&self) -> Cart {
        self.shared.state().cart.clone()
    }

    /// Render counter; changes after every re-render.
    pub fn revisions(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub fn select_category(&self, category_id: Option<&str>) {
        let mut state = self.shared.state();
        state.selected_category = category_id.map(str::to_string);
        self.shared.render(&mut state);
    }

    /// Routes a user action from the rendered tree. Returns false if the
    /// action refers to something this page does not show.
    pub fn dispatch(&self, action: &Action) -> bool {
        // Run the callbacks against a snapshot so they can take the lock.
        let (vendor, items, categories) = {
            let state = self.shared.state();
            let Some(vendor) = state.vendor.clone() else {
                return false;
            };
            (vendor, state.menu_items.clone(), state.categories.clone())
        };

        let mut ctx = RenderContext::new(&vendor, &items, &categories);
        let weak = Arc::downgrade(&self.shared);
        ctx.on_category_change = Arc::new(move |category_id: Option<String>| {
            if let Some(shared) = weak.upgrade() {
                let mut state = shared.state();
                state.selected_category = category_id;
                shared.render(&mut state);
            }
        });
        let weak = Arc::downgrade(&self.shared);
        ctx.on_add_to_cart = Arc::new(move |item: MenuItem| {
            if let Some(shared) = weak.upgrade() {
                let mut state = shared.state();
                state.cart.add(&item);
                shared.render(&mut state);
            }
        });

        ctx.dispatch(action)
    }
}

fn not_found(slug: &str) -> Node {
    Node::element("main")
        .class("store-not-found")
        .child(Node::text_element("h1", "Store not found"))
        .child(Node::text_element(
            "p",
            format!("No storefront is published at /store/{slug}"),
        ))
}
