//! Ratelimiter Service Lifecycle
//!
//! 레이트리미터 서비스 수명 주기 통합 테스트
//!
//! 실제 라우터를 거쳐 인메모리 가짜 클러스터로 전체 수명 주기를
//! 검증합니다: 노드 생성, 리소스 생성/조회/변경/목록/획득, 정리.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;

use stratadb_driver::{
    BalancerConfig, CallContext, Conn, ConnRef, ConnState, Credentials, Driver, DriverConfig,
    DriverError, DriverResult, Endpoint, HierarchicalDrrSettings, NodeConfig, Request, Resource,
    Response, StatusCode, TransportErrorCode,
};

const TEST_COORDINATION_NODE_PATH: &str = "/local/test";
const TEST_RESOURCE: &str = "test_res";

// ============================================================================
// 가짜 클러스터
// ============================================================================

/// 코디네이션 노드와 레이트리미터 리소스를 흉내 내는 인메모리 클러스터
#[derive(Default)]
struct FakeCluster {
    nodes: Mutex<HashMap<String, NodeConfig>>,
    resources: Mutex<HashMap<(String, String), Resource>>,
    calls_by_node: Mutex<HashMap<u32, usize>>,
}

impl FakeCluster {
    fn handle(&self, node_id: u32, request: Request) -> DriverResult<Response> {
        *self.calls_by_node.lock().entry(node_id).or_insert(0) += 1;

        match request {
            Request::CreateNode { path, mut config } => {
                config.path = path.clone();
                self.nodes.lock().insert(path, config);
                Ok(Response::Done)
            }
            Request::DropNode { path } => {
                if self.nodes.lock().remove(&path).is_none() {
                    return Err(DriverError::operation(
                        StatusCode::SchemeError,
                        format!("coordination node does not exist: {}", path),
                    ));
                }
                self.resources.lock().retain(|(node, _), _| node != &path);
                Ok(Response::Done)
            }
            Request::DescribeNode { path } => {
                let nodes = self.nodes.lock();
                let config = nodes.get(&path).ok_or_else(|| {
                    DriverError::operation(
                        StatusCode::SchemeError,
                        format!("coordination node does not exist: {}", path),
                    )
                })?;
                Ok(Response::NodeDescription(config.clone()))
            }
            Request::CreateResource {
                coordination_path,
                resource,
            } => {
                self.ensure_node(&coordination_path)?;
                self.resources
                    .lock()
                    .insert((coordination_path, resource.resource_path.clone()), resource);
                Ok(Response::Done)
            }
            Request::AlterResource {
                coordination_path,
                resource,
            } => {
                let key = (coordination_path, resource.resource_path.clone());
                let mut resources = self.resources.lock();
                if !resources.contains_key(&key) {
                    return Err(DriverError::operation(
                        StatusCode::NotFound,
                        format!("resource does not exist: {}", resource.resource_path),
                    ));
                }
                resources.insert(key, resource);
                Ok(Response::Done)
            }
            Request::DropResource {
                coordination_path,
                resource_path,
            } => {
                let removed = self
                    .resources
                    .lock()
                    .remove(&(coordination_path, resource_path.clone()));
                if removed.is_none() {
                    return Err(DriverError::operation(
                        StatusCode::NotFound,
                        format!("resource does not exist: {}", resource_path),
                    ));
                }
                Ok(Response::Done)
            }
            Request::ListResources {
                coordination_path,
                prefix,
                ..
            } => {
                let resources = self.resources.lock();
                let mut paths: Vec<String> = resources
                    .keys()
                    .filter(|(node, resource)| node == &coordination_path && resource.starts_with(&prefix))
                    .map(|(_, resource)| resource.clone())
                    .collect();
                paths.sort();
                Ok(Response::ResourceList(paths))
            }
            Request::DescribeResource {
                coordination_path,
                resource_path,
            } => {
                let resources = self.resources.lock();
                let resource = resources
                    .get(&(coordination_path, resource_path.clone()))
                    .ok_or_else(|| {
                        DriverError::operation(
                            StatusCode::NotFound,
                            format!("resource does not exist: {}", resource_path),
                        )
                    })?;
                Ok(Response::ResourceDescription(resource.clone()))
            }
            Request::AcquireResource {
                coordination_path,
                resource_path,
                amount,
                is_used_amount,
            } => {
                let resources = self.resources.lock();
                let resource = resources
                    .get(&(coordination_path, resource_path.clone()))
                    .ok_or_else(|| {
                        DriverError::operation(
                            StatusCode::NotFound,
                            format!("resource does not exist: {}", resource_path),
                        )
                    })?;

                // 사용량 보고는 항상 승인, 요청은 버스트 한도 내에서만 승인
                if is_used_amount {
                    return Ok(Response::Done);
                }
                let settings = resource.hierarchical_drr;
                let burst_capacity =
                    settings.max_units_per_second * settings.max_burst_size_coefficient;
                if (amount as f64) <= burst_capacity {
                    Ok(Response::Done)
                } else {
                    Err(DriverError::operation(
                        StatusCode::PreconditionFailed,
                        format!("cannot acquire {} units", amount),
                    ))
                }
            }
            _ => Err(DriverError::transport(
                TransportErrorCode::Unimplemented,
                "not supported by fake cluster",
            )),
        }
    }

    fn ensure_node(&self, path: &str) -> DriverResult<()> {
        if self.nodes.lock().contains_key(path) {
            Ok(())
        } else {
            Err(DriverError::operation(
                StatusCode::SchemeError,
                format!("coordination node does not exist: {}", path),
            ))
        }
    }

    fn calls_for(&self, node_id: u32) -> usize {
        self.calls_by_node.lock().get(&node_id).copied().unwrap_or(0)
    }
}

struct ClusterConn {
    cluster: Arc<FakeCluster>,
    endpoint: Endpoint,
    state: ConnState,
}

impl Conn for ClusterConn {
    fn endpoint(&self) -> Endpoint {
        self.endpoint.clone()
    }

    fn state(&self) -> ConnState {
        self.state
    }

    fn call(&self, request: Request) -> BoxFuture<'_, DriverResult<Response>> {
        Box::pin(async move { self.cluster.handle(self.endpoint.node_id(), request) })
    }
}

fn cluster_conn(cluster: &Arc<FakeCluster>, node_id: u32, state: ConnState, location: &str) -> ConnRef {
    Arc::new(ClusterConn {
        cluster: cluster.clone(),
        endpoint: Endpoint::new(node_id, format!("node{}.cluster:2135", node_id), location),
        state,
    })
}

fn test_driver(cluster: &Arc<FakeCluster>) -> Driver {
    let config = DriverConfig::builder("strata://db.cluster:2135/?database=/local")
        .unwrap()
        .with_credentials(Credentials::anonymous())
        .with_location("dc-1")
        .with_request_timeout(Duration::from_secs(2))
        .with_stream_timeout(Duration::from_secs(2))
        .with_operation_timeout(Duration::from_secs(2))
        .with_operation_cancel_after(Duration::from_secs(2))
        .with_balancer(BalancerConfig::random_choice().prefer_local_dc_with_fallback())
        .build();
    let driver = Driver::new(config).unwrap();

    driver
        .update_endpoints(vec![
            cluster_conn(cluster, 1, ConnState::Online, "dc-1"),
            cluster_conn(cluster, 2, ConnState::Online, "dc-2"),
            cluster_conn(cluster, 3, ConnState::Banned, "dc-1"),
        ])
        .unwrap();

    driver
}

// ============================================================================
// 수명 주기
// ============================================================================

#[tokio::test]
async fn test_ratelimiter_lifecycle() {
    let cluster = Arc::new(FakeCluster::default());
    let driver = test_driver(&cluster);
    let ctx = CallContext::new();

    let coordination = driver.coordination();
    let ratelimiter = driver.ratelimiter();

    // drop node: 잔존물이 있으면 제거, 없으면 스키마 에러 용인
    match coordination.drop_node(&ctx, TEST_COORDINATION_NODE_PATH).await {
        Ok(()) => {}
        Err(e) => {
            assert_eq!(e.status_code(), Some(StatusCode::SchemeError));
        }
    }

    // create node
    coordination
        .create_node(
            &ctx,
            TEST_COORDINATION_NODE_PATH,
            NodeConfig {
                self_check_period_millis: 1000,
                session_grace_period_millis: 1000,
                read_consistency_mode: stratadb_driver::ConsistencyMode::Relaxed,
                attach_consistency_mode: stratadb_driver::ConsistencyMode::Relaxed,
                ratelimiter_counters_mode: stratadb_driver::RatelimiterCountersMode::Detailed,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // create resource
    ratelimiter
        .create_resource(
            &ctx,
            TEST_COORDINATION_NODE_PATH,
            Resource::new(
                TEST_RESOURCE,
                HierarchicalDrrSettings {
                    max_units_per_second: 1.0,
                    max_burst_size_coefficient: 2.0,
                    ..Default::default()
                },
            ),
        )
        .await
        .unwrap();

    // describe resource
    let described = ratelimiter
        .describe_resource(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE)
        .await
        .unwrap();
    assert_eq!(described.resource_path, TEST_RESOURCE);
    assert_eq!(described.hierarchical_drr.max_units_per_second, 1.0);
    assert_eq!(described.hierarchical_drr.max_burst_size_coefficient, 2.0);

    // alter resource
    ratelimiter
        .alter_resource(
            &ctx,
            TEST_COORDINATION_NODE_PATH,
            Resource::new(
                TEST_RESOURCE,
                HierarchicalDrrSettings {
                    max_units_per_second: 3.0,
                    max_burst_size_coefficient: 4.0,
                    ..Default::default()
                },
            ),
        )
        .await
        .unwrap();

    // check altered resource
    let described = ratelimiter
        .describe_resource(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE)
        .await
        .unwrap();
    assert_eq!(described.hierarchical_drr.max_units_per_second, 3.0);
    assert_eq!(described.hierarchical_drr.max_burst_size_coefficient, 4.0);

    // list resource
    let list = ratelimiter
        .list_resources(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE, true)
        .await
        .unwrap();
    assert_eq!(list, vec![TEST_RESOURCE.to_string()]);

    // acquire resource amount <1, false>
    ratelimiter
        .acquire_resource(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE, 1, false)
        .await
        .unwrap();

    // acquire resource amount <10000, true>: 사용량 보고는 항상 승인
    ratelimiter
        .acquire_resource(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE, 10000, true)
        .await
        .unwrap();

    // acquire resource amount <10000, false>: 버스트 한도 초과로 거부
    let result = ratelimiter
        .acquire_resource(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE, 10000, false)
        .await;
    assert!(result.is_err(), "resource must not be acquired");

    // cleanup resource
    ratelimiter
        .drop_resource(&ctx, TEST_COORDINATION_NODE_PATH, TEST_RESOURCE)
        .await
        .unwrap();

    // cleanup node
    coordination
        .drop_node(&ctx, TEST_COORDINATION_NODE_PATH)
        .await
        .unwrap();

    // cleanup connection
    driver.close().await.unwrap();
}

// ============================================================================
// 라우팅 동작
// ============================================================================

#[tokio::test]
async fn test_requests_stay_in_local_dc() {
    let cluster = Arc::new(FakeCluster::default());
    let driver = test_driver(&cluster);
    let ctx = CallContext::new();

    let coordination = driver.coordination();
    coordination
        .create_node(&ctx, TEST_COORDINATION_NODE_PATH, NodeConfig::default())
        .await
        .unwrap();

    for _ in 0..20 {
        coordination
            .describe_node(&ctx, TEST_COORDINATION_NODE_PATH)
            .await
            .unwrap();
    }

    // 로컬 DC의 온라인 노드만 사용됨
    assert!(cluster.calls_for(1) >= 21);
    assert_eq!(cluster.calls_for(2), 0);
    assert_eq!(cluster.calls_for(3), 0);
}

#[tokio::test]
async fn test_fallback_to_remote_dc_when_local_unhealthy() {
    let cluster = Arc::new(FakeCluster::default());
    let driver = test_driver(&cluster);
    let ctx = CallContext::new();

    // 로컬 DC가 전부 비정상인 토폴로지로 교체
    driver
        .update_endpoints(vec![
            cluster_conn(&cluster, 1, ConnState::Banned, "dc-1"),
            cluster_conn(&cluster, 2, ConnState::Online, "dc-2"),
        ])
        .unwrap();

    let coordination = driver.coordination();
    coordination
        .create_node(&ctx, TEST_COORDINATION_NODE_PATH, NodeConfig::default())
        .await
        .unwrap();

    assert_eq!(cluster.calls_for(1), 0);
    assert!(cluster.calls_for(2) >= 1);
}

#[tokio::test]
async fn test_pinned_endpoint_overrides_routing() {
    let cluster = Arc::new(FakeCluster::default());
    let driver = test_driver(&cluster);

    let coordination = driver.coordination();
    coordination
        .create_node(&CallContext::new(), TEST_COORDINATION_NODE_PATH, NodeConfig::default())
        .await
        .unwrap();

    // 원격 DC 노드를 고정하면 선호 정책을 우회
    let pinned = CallContext::new().with_endpoint(Endpoint::new(2, "node2.cluster:2135", "dc-2"));
    coordination
        .describe_node(&pinned, TEST_COORDINATION_NODE_PATH)
        .await
        .unwrap();

    assert_eq!(cluster.calls_for(2), 1);
}

#[tokio::test]
async fn test_no_endpoints_after_empty_update() {
    let cluster = Arc::new(FakeCluster::default());
    let driver = test_driver(&cluster);

    driver.update_endpoints(Vec::new()).unwrap();

    let result = driver
        .ratelimiter()
        .describe_resource(&CallContext::new(), TEST_COORDINATION_NODE_PATH, TEST_RESOURCE)
        .await;
    assert!(matches!(result, Err(DriverError::NoEndpoints)));
}
