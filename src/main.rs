//! menuflow console - drive a demo menu from the terminal
//!
//! Type an option number to press it, `q` to quit.

use async_trait::async_trait;
use menuflow::console::ConsoleMessenger;
use menuflow::i18n::Catalog;
use menuflow::platform::LoggingMessenger;
use menuflow::{
    endpoint_fn, Callback, ChatId, Directive, Endpoint, EndpointContext, InMemorySessions, Menu,
    MenuBuilder, MenuConfig, MenuTree, UserId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Switches the user's language and stays on the screen
struct SetLanguage(&'static str);

#[async_trait]
impl Endpoint for SetLanguage {
    async fn handle(&self, cx: &mut EndpointContext<'_>) -> Directive {
        if let Err(e) = cx.set_language(self.0).await {
            tracing::warn!(error = %e, "Language switch did not reach the screen");
        }
        Directive::Stay
    }
}

fn demo_tree() -> MenuTree {
    let builder = MenuBuilder::new();
    let root = builder.root();

    let orders = Arc::new(AtomicUsize::new(0));
    let order = move |drink: &'static str| {
        let orders = Arc::clone(&orders);
        endpoint_fn(move |cx| {
            let n = orders.fetch_add(1, Ordering::Relaxed) + 1;
            cx.set_caption_fmt("{} ordered ({} so far)", &[&drink, &n]);
            Directive::Forward
        })
    };

    let drinks = root.add_child("drinks", None);
    drinks.add_child("coffee", Some(order("coffee")));
    drinks.add_child("tea", Some(order("tea")));
    drinks.add_child("back", Some(endpoint_fn(|_| Directive::Back)));

    let english = builder.node("en", Some(Arc::new(SetLanguage("en"))));
    let french = builder.node("fr", Some(Arc::new(SetLanguage("fr"))));
    let settings = root.add_child("settings", None);
    if let Err(e) = settings.add_child_with("language", None, &[english, french]) {
        tracing::error!(error = %e, "Failed to assemble language menu");
    }

    builder.build()
}

fn demo_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .insert("en", "menu/drinks", "Drinks")
        .insert("en", "menu/drinks/coffee", "Coffee")
        .insert("en", "menu/drinks/tea", "Tea")
        .insert("en", "menu/drinks/back", "Back")
        .insert("en", "menu/settings", "Settings")
        .insert("en", "menu/settings/language", "Language")
        .insert("en", "menu/settings/language/en", "English")
        .insert("en", "menu/settings/language/fr", "French")
        .insert("fr", "menu/drinks", "Boissons")
        .insert("fr", "menu/drinks/coffee", "Café")
        .insert("fr", "menu/drinks/tea", "Thé")
        .insert("fr", "menu/drinks/back", "Retour")
        .insert("fr", "menu/settings", "Réglages")
        .insert("fr", "menu/settings/language", "Langue")
        .insert("fr", "menu/settings/language/en", "Anglais")
        .insert("fr", "menu/settings/language/fr", "Français");
    catalog
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menuflow=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = MenuConfig::from_env();
    let catalog = match MenuConfig::catalog_dir() {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Loading label catalogs");
            Catalog::from_dir(&dir)?
        }
        None => {
            if !config.locales.iter().any(|l| l == "fr") {
                config.locales.push("fr".to_string());
            }
            demo_catalog()
        }
    };

    let console = Arc::new(ConsoleMessenger::new());
    let menu = Menu::new(
        demo_tree(),
        config,
        Arc::new(LoggingMessenger::new(console.clone())),
        Arc::new(catalog),
        Arc::new(InMemorySessions::new()),
    );
    menu.render_all().await?;

    let user = UserId(1);
    menu.open(user, ChatId(1), "Welcome! Pick an option.").await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut presses = 0u64;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "q" {
            break;
        }
        let Some(data) = line.parse().ok().and_then(|choice| console.option(choice)) else {
            println!("No such option: {line}");
            continue;
        };
        presses += 1;
        let callback = Callback {
            id: format!("console-{presses}"),
            user,
            data,
            message: None,
        };
        if let Err(e) = menu.dispatch(&callback).await {
            tracing::debug!(error = %e, "Press not handled");
        }
    }

    tracing::info!(presses, "Console session ended");
    Ok(())
}
