//! Navigation against lazily loaded routes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futures::channel::oneshot;
use sprout_router::{
    Component, ComponentLoader, LazyRouteTable, LoadError, Navigator, Route, RouteError,
};

/// A loader that counts invocations and settles when the test says so.
fn gated_loader(
    calls: Arc<AtomicUsize>,
) -> (ComponentLoader, oneshot::Sender<Result<Component, LoadError>>) {
    let (tx, rx) = oneshot::channel();
    let rx = Arc::new(Mutex::new(Some(rx)));
    let loader = ComponentLoader::new(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        let rx = rx.lock().expect("lock").take();
        async move {
            match rx {
                Some(rx) => rx.await.unwrap_or_else(|_| Err("load abandoned".into())),
                None => Err("loader already used".into()),
            }
        }
    });
    (loader, tx)
}

fn table_with(loader: ComponentLoader) -> LazyRouteTable {
    LazyRouteTable::new(vec![
        Route::redirect("/", "index", "/hello")
            .children(vec![Route::lazy("/hello", "hello", loader)]),
    ])
    .expect("table")
}

#[tokio::test]
async fn hello_loader_runs_once_and_suspends_until_settled() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (loader, tx) = gated_loader(Arc::clone(&calls));
    let navigator = Navigator::new(Arc::new(table_with(loader)));

    let mut pending = Box::pin(navigator.navigate("/hello"));
    assert!(futures::poll!(&mut pending).is_pending());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tx.send(Ok(Component::new("@views/hello/index")))
        .expect("navigation still waiting");
    let navigation = pending.await.expect("navigate");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(navigation.route, "hello");
    assert_eq!(navigation.component, Component::new("@views/hello/index"));
}

#[tokio::test]
async fn root_navigation_follows_redirect() {
    let navigator = Navigator::new(Arc::new(table_with(ComponentLoader::import(
        "@views/hello/index",
    ))));
    let navigation = navigator.navigate("/").await.expect("navigate");
    assert_eq!(navigation.requested, "/");
    assert_eq!(navigation.resolved, "/hello");
}

#[tokio::test]
async fn each_navigation_loads_again() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let loader = ComponentLoader::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, LoadError>(Component::new("@views/hello/index")) }
    });
    let navigator = Navigator::new(Arc::new(table_with(loader)));

    let (a, b) = futures::join!(navigator.navigate("/hello"), navigator.navigate("/"));
    a.expect("first");
    b.expect("second");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_load_surfaces_to_caller() {
    let loader = ComponentLoader::new(|| async { Err::<Component, LoadError>("chunk 404".into()) });
    let navigator = Navigator::new(Arc::new(table_with(loader)));
    let err = navigator.navigate("/hello").await.unwrap_err();
    assert_eq!(
        err,
        RouteError::LoadFailed {
            route: "hello".into(),
            reason: "chunk 404".into()
        }
    );
}

#[tokio::test]
async fn unknown_path_does_not_load() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (loader, _tx) = gated_loader(Arc::clone(&calls));
    let navigator = Navigator::new(Arc::new(table_with(loader)));
    let err = navigator.navigate("/nope").await.unwrap_err();
    assert!(matches!(err, RouteError::NoMatch { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
