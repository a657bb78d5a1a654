//! Proxy Preview - Static and proxy-driven image views side by side.
//!
//! This demo shows both ways of feeding an image view:
//! - A static node that owns its image
//! - A manual node driven through a proxy, fed by a worker thread
//!
//! Run with: RUST_LOG=spark_view_bridge=debug cargo run --example proxy_preview

use std::thread;

use spark_view_bridge::{
    ContentRef, Environment, Host, HostConfig, Image, ImageNode, ImageView, Rgba, Size, UiQueue,
    ViewProxy, ViewTree,
};
use tracing_subscriber::EnvFilter;

const FRAME: Size = Size::new(180, 180);

fn solid(hue: f32) -> Image {
    Image::solid(Rgba::hsb(hue, 0.8, 0.95), Size::new(256, 256))
}

fn tree(proxy: &ViewProxy<ImageView>, backdrop: &ContentRef<Image>) -> ViewTree<ImageNode> {
    ViewTree::group([
        ViewTree::leaf("static", ImageNode::image(Some(backdrop.clone()))),
        ViewTree::leaf(
            "manual",
            ImageNode::manual(Some(proxy.clone())).configure(|view| {
                view.set_clear_color(Rgba::BLACK);
                view.set_size(FRAME);
            }),
        ),
    ])
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-view-bridge Proxy Preview ===\n");

    let config = HostConfig::new("preview").with_queue_capacity(2);
    let (queue, sender) = UiQueue::<Image>::from_config(&config);
    let mut host = Host::new(config);
    let root = Environment::new();

    let proxy = ViewProxy::<ImageView>::new();
    let backdrop = ContentRef::new(solid(0.58));

    // Unbound proxy: safe no-op
    proxy.set_image(Some(ContentRef::new(solid(0.0))));
    println!("Before mount: bound = {}", proxy.is_bound());

    if let Err(err) = host.recompute(&tree(&proxy, &backdrop), &root) {
        eprintln!("mount failed: {err}");
        return;
    }
    println!("After mount:  bound = {}", proxy.is_bound());

    // Worker thread renders frames; the UI context applies them
    let worker = thread::spawn(move || {
        let mut hue = 0.37_f32;
        for _ in 0..5 {
            hue = (hue + 0.12) % 1.0;
            if sender.send(solid(hue)).is_err() {
                break;
            }
        }
    });

    println!("\n--- Advancing frames ---\n");
    while let Ok(frame) = queue.recv() {
        proxy.set_image(Some(ContentRef::new(frame)));
        // Each pass re-runs update_view; the static image is not rewritten
        if let Err(err) = host.recompute(&tree(&proxy, &backdrop), &root) {
            eprintln!("update failed: {err}");
            return;
        }

        proxy.perform(|view| {
            let color = view.sample(0, 0).unwrap_or(Rgba::TRANSPARENT);
            println!("  manual view shows {color} (revision {})", proxy.revision());
        });
    }
    if worker.join().is_err() {
        eprintln!("worker panicked");
    }

    if let Some(view) = host.view("static") {
        println!("\nStatic view image writes: {}", view.borrow().content_writes());
    }

    host.clear();
    println!("After unmount: bound = {}", proxy.is_bound());
}
