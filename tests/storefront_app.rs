//! The storefront's route set, rendered on the server and then driven in
//! the client, through the `storefront` facade.

use rstest::{fixture, rstest};
use serde::Serialize;
use serial_test::serial;
use std::io::Write;
use std::rc::Rc;
use storefront::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
	Home,
	Product,
	Cart,
	NotFound,
}

#[derive(Serialize)]
struct ProductProps {
	id: u64,
	name: String,
}

fn register(router: &UniversalRouter<Page>) {
	router.add_route("/", Page::Home);
	router.add_route_with(
		"/product/:id/",
		Page::Product,
		RouteHooks::new()
			.on_server_render(|ctx: NavigationContext| async move {
				let id: u64 = ctx.params["id"].parse()?;
				Ok::<_, BoxError>(ProductProps {
					id,
					name: format!("Mug #{}", id),
				})
			})
			.on_metadata(|ctx: NavigationContext| async move {
				Ok::<_, BoxError>(
					PageMetadata::new(format!("Mug #{}", ctx.params["id"]))
						.with_description("Stoneware, 350 ml")
						.with_image(format!("/img/{}.png", ctx.params["id"])),
				)
			}),
	);
	router.add_route("/cart/", Page::Cart);
	router.add_route(".*", Page::NotFound);
}

/// Shared view code: the same function runs on both engines.
fn title_of(router: &UniversalRouter<Page>) -> String {
	match router.target() {
		Some(Page::Product) => format!("product {}", router.params()["id"]),
		Some(Page::Cart) => "cart".to_string(),
		Some(Page::Home) => "home".to_string(),
		Some(Page::NotFound) | None => "not found".to_string(),
	}
}

#[fixture]
fn server() -> UniversalRouter<Page> {
	let router = UniversalRouter::server("/shop/");
	register(&router);
	router
}

#[rstest]
#[tokio::test]
async fn test_server_render_of_product_page(server: UniversalRouter<Page>) {
	let url = "https://store.example/shop/product/12/?ref=home";

	let matched = server.create_context(url).unwrap().unwrap();
	let props = server.prefetch(url).await.unwrap();
	let metadata = server.generate_metadata(url).await.unwrap();

	assert_eq!(matched.handler, Page::Product);
	assert_eq!(title_of(&server), "product 12");
	assert_eq!(server.query()["ref"], "home");
	assert_eq!(
		props,
		Some(serde_json::json!({"id": 12, "name": "Mug #12"}))
	);
	let metadata = metadata.unwrap();
	assert_eq!(metadata.title, "Mug #12");
	assert_eq!(metadata.image.as_deref(), Some("/img/12.png"));
}

#[rstest]
#[tokio::test]
async fn test_bad_product_id_degrades_to_empty_props(server: UniversalRouter<Page>) {
	assert_eq!(server.prefetch("/shop/product/abc/").await, Ok(None));
	assert_eq!(server.prefetch("/shop/cart/").await, Ok(None));
	assert_eq!(server.prefetch("/shop/nowhere/").await, Ok(None));
}

#[rstest]
fn test_client_takes_over_where_server_left() {
	let server = UniversalRouter::server("/shop");
	register(&server);
	server.start_with("/shop/product/12/").unwrap();

	let history = MemoryHistory::at("/shop/product/12/").unwrap();
	let client = Rc::new(UniversalRouter::client(history.clone(), "/shop"));
	register(&client);
	client.start();

	assert_eq!(title_of(&client), title_of(&server));

	let _provider = provide_router(Rc::clone(&client));
	let titles = Rc::new(std::cell::RefCell::new(Vec::new()));
	let _sub = client.subscribe({
		let titles = Rc::clone(&titles);
		move || {
			let title = with_router(|router: &UniversalRouter<Page>| title_of(router)).unwrap();
			titles.borrow_mut().push(title);
		}
	});

	client.navigate(&NavigationIntent::new("/cart/"));
	client.push("/product/3/");
	client.push("/checkout/");
	assert!(history.back());

	assert_eq!(
		*titles.borrow(),
		vec!["cart", "product 3", "not found", "product 3"]
	);
}

#[rstest]
#[serial(env)]
fn test_load_router_from_settings_file() {
	// SAFETY: serialized by #[serial(env)]
	unsafe {
		std::env::remove_var("STOREFRONT_BASE_URL");
		std::env::remove_var("STOREFRONT_SSR");
	}
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[router]\nbase_url = \"/shop/\"").unwrap();

	let router: UniversalRouter<Page> = load_router(Some(file.path())).unwrap();
	register(&router);

	assert_eq!(router.mode(), RouterMode::Server);
	assert_eq!(router.base_url(), "/shop");
	router.start_with("/shop/cart/").unwrap();
	assert_eq!(title_of(&router), "cart");
}
