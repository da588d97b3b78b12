//! Vitrine terminal client - composition root.
//!
//! Ties together the Vitrine crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the HTTP backend client
//! 3. Run a line-based chat loop against the session orchestrator
//!
//! Session commands (`/sessions`, `/switch`, `/new`, ...) map onto
//! orchestrator operations; everything else is sent to the assistant.

mod cli;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use vitrine_backend::{HttpBackend, StorefrontBackend};
use vitrine_cart::StockReconciler;
use vitrine_chat::{
    order_confirmation_id, ChatOrchestrator, MessageContent, MessageRole, QuickReplyOption,
};
use vitrine_core::config::VitrineConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = VitrineConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Vitrine v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Backend.
    let mut backend_config = config.backend.clone();
    if let Some(url) = args.base_url.clone() {
        backend_config.base_url = url;
    }
    backend_config.bearer_token = args.resolve_token(backend_config.bearer_token.as_deref());

    let backend = Arc::new(HttpBackend::from_config(&backend_config)?);
    tracing::info!(base_url = %backend_config.base_url, authenticated = backend.is_authenticated(), "Backend client ready");

    let orchestrator = ChatOrchestrator::new(backend.clone(), config.chat.clone());
    let reconciler = StockReconciler::new(backend);

    if let Err(e) = orchestrator.load_sessions().await {
        tracing::warn!("Initial session list load failed: {e}");
    }

    println!("Vitrine storefront chat. Type a message, /help for commands, /quit to exit.");
    print_suggestions(&orchestrator.suggestions());

    let mut printed = 0usize;
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["/quit"] | ["/exit"] => break,
            ["/help"] => print_help(),
            ["/sessions"] => {
                orchestrator.load_sessions().await?;
                let sessions = orchestrator.sessions();
                if sessions.is_empty() {
                    println!("No saved sessions.");
                }
                for (i, s) in sessions.iter().enumerate() {
                    println!("  [{i}] {} ({})", s.session_id, s.created_at.to_rfc3339());
                }
            }
            ["/switch", index] => match parse_session_index(&orchestrator, index) {
                Some(session) => {
                    orchestrator.switch_session(&session).await?;
                    if let Some(e) = orchestrator.history_error() {
                        println!("Could not load that session: {e}");
                    } else {
                        printed = 0;
                    }
                }
                None => println!("No session at index {index}; run /sessions first."),
            },
            ["/delete", index] => match parse_session_index(&orchestrator, index) {
                Some(session) => {
                    orchestrator.delete_session(&session.session_id).await?;
                    println!("Deleted session {}.", session.session_id);
                    printed = printed.min(orchestrator.messages().len());
                }
                None => println!("No session at index {index}; run /sessions first."),
            },
            ["/new"] => {
                orchestrator.start_new_session()?;
                printed = 0;
                println!("Started a new conversation.");
            }
            ["/retry"] => orchestrator.retry().await?,
            ["/tap", index] => {
                let suggestions = orchestrator.suggestions();
                match index.parse::<usize>().ok().and_then(|i| suggestions.get(i)) {
                    Some(option) => orchestrator.handle_quick_reply(option).await?,
                    None => println!("No suggestion at index {index}."),
                }
            }
            ["/stock"] => {
                match reconciler.sync_cart().await {
                    Ok(()) => print_stock_issues(&reconciler),
                    Err(e) => println!("Stock check failed: {e}"),
                }
            }
            ["/add", product_id] => match product_id.parse::<i64>() {
                Ok(id) => orchestrator.handle_add_to_cart(id).await?,
                Err(_) => println!("Usage: /add <product-id>"),
            },
            _ => {
                if let Err(e) = orchestrator.send_message(&line).await {
                    println!("Could not send that: {e}");
                }
            }
        }

        printed = print_new_messages(&orchestrator, &reconciler, printed).await;
        print_suggestions(&orchestrator.suggestions());
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  /sessions          list your saved sessions");
    println!("  /switch <index>    open a saved session");
    println!("  /delete <index>    delete a saved session");
    println!("  /new               start a fresh conversation");
    println!("  /retry             resend after a failed turn");
    println!("  /tap <index>       tap a suggested reply");
    println!("  /add <product-id>  add a product to your cart");
    println!("  /stock             re-check stock for everything in your cart");
    println!("  /quit              exit");
}

fn parse_session_index(
    orchestrator: &ChatOrchestrator,
    index: &str,
) -> Option<vitrine_core::SessionSummary> {
    index
        .parse::<usize>()
        .ok()
        .and_then(|i| orchestrator.sessions().get(i).cloned())
}

/// Print messages appended since the last prompt; returns the new high-water
/// mark. A cart summary in fresh assistant content also triggers a stock
/// reconciliation pass.
async fn print_new_messages(
    orchestrator: &ChatOrchestrator,
    reconciler: &StockReconciler,
    printed: usize,
) -> usize {
    let messages = orchestrator.messages();
    let mut cart_seen = false;
    for message in messages.iter().skip(printed) {
        let speaker = match message.role {
            MessageRole::User => "you",
            MessageRole::Assistant => "shop",
            MessageRole::System => "sys",
        };
        for content in &message.content {
            print_content(speaker, content);
            if message.role == MessageRole::Assistant {
                if let MessageContent::CartSummary { cart } = content {
                    if reconciler.set_cart_lines(cart.items.clone()).is_ok() {
                        cart_seen = true;
                    }
                }
            }
        }
    }

    if cart_seen {
        if let Err(e) = reconciler.refresh().await {
            tracing::warn!("Stock reconciliation failed: {e}");
        }
        print_stock_issues(reconciler);
    }

    messages.len()
}

fn print_content(speaker: &str, content: &MessageContent) {
    match content {
        MessageContent::Text { text } => {
            println!("[{speaker}] {text}");
            if speaker == "shop" {
                if let Some(order_id) = order_confirmation_id(text) {
                    println!("  (order {order_id} placed; ask \"Show me order {order_id}\" for details)");
                }
            }
        }
        MessageContent::ProductCard { product } => {
            println!(
                "[{speaker}] {} by {} (${:.2}, id {})",
                product.product_name, product.product_brand, product.retail_price, product.product_id
            );
        }
        MessageContent::ProductList { products, title, .. } => {
            if let Some(title) = title {
                println!("[{speaker}] {title}:");
            }
            for p in products {
                println!(
                    "    - {} by {} (${:.2}, id {})",
                    p.product_name, p.product_brand, p.retail_price, p.product_id
                );
            }
        }
        MessageContent::CartSummary { cart } => {
            println!(
                "[{speaker}] Cart #{}: {} item(s), total ${:.2}",
                cart.order_id, cart.num_of_item, cart.total_price
            );
        }
        MessageContent::OrderSummary { order } => {
            println!(
                "[{speaker}] Order #{}, {} ({} item(s))",
                order.order_id, order.status, order.num_of_item
            );
        }
        MessageContent::VoucherCard { voucher } => {
            println!(
                "[{speaker}] Voucher {}: {} off",
                voucher.voucher_code, voucher.discount_value
            );
        }
        MessageContent::CategoryList { categories } => {
            for c in categories {
                println!(
                    "    - {}",
                    c.product_category_name.as_deref().unwrap_or(&c.product_category_id)
                );
            }
        }
        MessageContent::QuickReplies { options } => print_suggestions(options),
        MessageContent::Error { message, .. } => println!("[{speaker}] error: {message}"),
        MessageContent::Unknown => {}
    }
}

fn print_stock_issues(reconciler: &StockReconciler) {
    for product_id in reconciler.cart_product_ids() {
        if let Some(msg) = reconciler.stock_issue_message(product_id) {
            println!("  ! product {product_id}: {msg}");
        }
    }
    if reconciler.checkout_allowed() {
        println!("  Cart is clear to checkout.");
    }
}

fn print_suggestions(options: &[QuickReplyOption]) {
    if options.is_empty() {
        return;
    }
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    println!("  suggestions: {}", labels.join(" | "));
}
