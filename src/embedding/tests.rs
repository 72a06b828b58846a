use super::client::QueryEmbedder;
use super::mock::MockEmbedder;

#[tokio::test]
async fn test_mock_embedder_is_deterministic() {
    let embedder = MockEmbedder::new(384);

    let a = embedder.embed("35F with pelvic pain").await.unwrap();
    let b = embedder.embed("35F with pelvic pain").await.unwrap();

    assert_eq!(a, b);
    assert_eq!(a.len(), 384);
}

#[tokio::test]
async fn test_mock_embedder_differs_across_inputs() {
    let embedder = MockEmbedder::new(16);

    let a = embedder.embed("endometriosis stage III").await.unwrap();
    let b = embedder.embed("healthy volunteer").await.unwrap();

    assert_ne!(a, b);
}

#[tokio::test]
async fn test_mock_embedder_respects_dimension() {
    let embedder = MockEmbedder::new(8);
    let v = embedder.embed("anything").await.unwrap();
    assert_eq!(v.len(), 8);
}
