// src/test_support.rs
//
// Backend falso em processo para os testes assíncronos.

use axum::Router;
use tokio::net::TcpListener;

/// Sobe o `router` em 127.0.0.1 numa porta livre e devolve a URL base.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}
