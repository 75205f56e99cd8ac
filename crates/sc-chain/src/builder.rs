//! Validated construction of a [`SupplyChain`].
//!
//! The builder takes node specs (SKU-keyed, all state optional) and edges,
//! then `build()` performs every configuration check up front: duplicate
//! ids, unknown references, multiplicities, cycles, and policy sanity.
//! Low-level codes and the two phase orderings are computed here; the
//! resulting chain's topology is immutable.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::info;

use sc_core::{
    LeadTimeProvider, LeadTimeSchedule, NodeId, Pipeline, Qty, Receipt, SalesProvider,
    SalesSchedule,
};

use crate::chain::SupplyChain;
use crate::edge::Edge;
use crate::error::{ChainError, ChainResult};
use crate::node::{Node, PolicyParams};

// ── NodeSpec ──────────────────────────────────────────────────────────────────

/// Everything needed to seed one node.  Only the SKU is required; state
/// fields default to empty/zero, the sales provider to an empty schedule and
/// the lead-time provider to one that errors on use.  `build()` rejects a
/// node that has a policy but no lead-time provider; leaving the provider
/// unset is only valid for nodes that never order or receive.
pub struct NodeSpec {
    sku: String,
    stock: Vec<(String, i64)>,
    backorders: i64,
    orders: Vec<(String, i64)>,
    pipeline: Vec<(String, u32, i64)>,
    sales: Option<Box<dyn SalesProvider>>,
    lead_time: Option<Box<dyn LeadTimeProvider>>,
    policy: Option<PolicyParams>,
    predecessors: Vec<Edge>,
}

impl NodeSpec {
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            stock: Vec::new(),
            backorders: 0,
            orders: Vec::new(),
            pipeline: Vec::new(),
            sales: None,
            lead_time: None,
            policy: None,
            predecessors: Vec::new(),
        }
    }

    /// Seed on-hand stock of `sku` (own or component) at this node.
    pub fn stock(mut self, sku: impl Into<String>, quantity: i64) -> Self {
        self.stock.push((sku.into(), quantity));
        self
    }

    /// Seed outstanding backorders.
    pub fn backorders(mut self, quantity: i64) -> Self {
        self.backorders = quantity;
        self
    }

    /// Seed an outstanding order from downstream `child`.
    pub fn order(mut self, child: impl Into<String>, quantity: i64) -> Self {
        self.orders.push((child.into(), quantity));
        self
    }

    /// Seed an in-transit receipt on this node's pipeline.
    pub fn receipt(mut self, sku: impl Into<String>, eta: u32, quantity: i64) -> Self {
        self.pipeline.push((sku.into(), eta, quantity));
        self
    }

    pub fn sales(mut self, sales: impl SalesProvider + 'static) -> Self {
        self.sales = Some(Box::new(sales));
        self
    }

    pub fn lead_time(mut self, lead_time: impl LeadTimeProvider + 'static) -> Self {
        self.lead_time = Some(Box::new(lead_time));
        self
    }

    pub fn policy(mut self, policy: PolicyParams) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Declare that `number` units of `source` are needed per unit of this
    /// node.  Node-level arcs take precedence over chain-level edges for the
    /// same source/destination pair.
    pub fn predecessor(mut self, source: impl Into<String>, number: i64) -> Self {
        let destination = self.sku.clone();
        self.predecessors.push(Edge::new(source, destination, number));
        self
    }

    /// Attach a fully specified predecessor edge (used by the JSON loader).
    /// Its destination must name this node; `build()` rejects mismatches.
    pub fn predecessor_edge(mut self, edge: Edge) -> Self {
        self.predecessors.push(edge);
        self
    }
}

// ── ChainBuilder ──────────────────────────────────────────────────────────────

/// Builder for [`SupplyChain`].
///
/// # Example
///
/// ```rust,ignore
/// let chain = ChainBuilder::new()
///     .node(NodeSpec::new("assembly").policy(params).sales(sales))
///     .node(NodeSpec::new("component").stock("component", 40))
///     .edge("component", "assembly", 2)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ChainBuilder {
    nodes: Vec<NodeSpec>,
    edges: Vec<Edge>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.nodes.push(spec);
        self
    }

    pub fn edge(
        mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
        number: i64,
    ) -> Self {
        self.edges.push(Edge::new(source, destination, number));
        self
    }

    /// Validate the configuration and build the chain.
    pub fn build(self) -> ChainResult<SupplyChain> {
        let node_count = self.nodes.len();

        // ── Index SKUs ────────────────────────────────────────────────────
        let mut index: HashMap<String, NodeId> = HashMap::with_capacity(node_count);
        for (i, spec) in self.nodes.iter().enumerate() {
            if index.insert(spec.sku.clone(), NodeId(i as u32)).is_some() {
                return Err(ChainError::DuplicateNode(spec.sku.clone()));
            }
        }
        let resolve = |sku: &str, context: &str| -> ChainResult<NodeId> {
            index.get(sku).copied().ok_or_else(|| ChainError::UnknownNode {
                context: context.to_owned(),
                sku: sku.to_owned(),
            })
        };

        // ── Merge edges: chain-level first, node predecessors overwrite ───
        let mut merged: BTreeMap<(NodeId, NodeId), i64> = BTreeMap::new();
        let mut insert_edge = |edge: &Edge| -> ChainResult<()> {
            if edge.number < 1 {
                return Err(ChainError::InvalidMultiplicity {
                    edge: edge.to_string(),
                    number: edge.number,
                });
            }
            let context = format!("edge {edge}");
            let source = resolve(&edge.source, &context)?;
            let destination = resolve(&edge.destination, &context)?;
            merged.insert((source, destination), edge.number);
            Ok(())
        };
        for edge in &self.edges {
            insert_edge(edge)?;
        }
        for spec in &self.nodes {
            for edge in &spec.predecessors {
                if edge.destination != spec.sku {
                    return Err(ChainError::PredecessorMismatch {
                        node: spec.sku.clone(),
                        edge: edge.to_string(),
                    });
                }
                insert_edge(edge)?;
            }
        }

        // ── Adjacency ─────────────────────────────────────────────────────
        let mut parents: Vec<Vec<(NodeId, i64)>> = vec![Vec::new(); node_count];
        let mut children: Vec<Vec<(NodeId, i64)>> = vec![Vec::new(); node_count];
        for (&(source, destination), &number) in &merged {
            parents[destination.index()].push((source, number));
            children[source.index()].push((destination, number));
        }

        // ── Low-level codes (longest path from any root) ──────────────────
        //
        // Kahn's algorithm doubles as the cycle check: a node is only popped
        // once all of its parents are settled, so its llc is final.
        let mut indegree: Vec<usize> = parents.iter().map(Vec::len).collect();
        let mut llc = vec![0u32; node_count];
        let mut queue: VecDeque<NodeId> = (0..node_count)
            .filter(|&i| indegree[i] == 0)
            .map(|i| NodeId(i as u32))
            .collect();
        let mut settled = 0usize;
        while let Some(parent) = queue.pop_front() {
            settled += 1;
            for &(child, _) in &children[parent.index()] {
                llc[child.index()] = llc[child.index()].max(llc[parent.index()] + 1);
                indegree[child.index()] -= 1;
                if indegree[child.index()] == 0 {
                    queue.push_back(child);
                }
            }
        }
        if settled < node_count {
            let cyclic: Vec<&str> = indegree
                .iter()
                .enumerate()
                .filter(|&(_, &d)| d > 0)
                .map(|(i, _)| self.nodes[i].sku.as_str())
                .collect();
            return Err(ChainError::Cycle(cyclic.join(", ")));
        }
        let max_llc = llc.iter().copied().max().unwrap_or(0);

        // ── Policy sanity ─────────────────────────────────────────────────
        //
        // A node with a policy will place orders, and every order needs a
        // lead time (its own, whether the batch comes from suppliers or its
        // own pipeline).  Catch a missing provider here rather than at the
        // node's first review moment.
        for spec in &self.nodes {
            if let Some(policy) = &spec.policy {
                if policy.review_time == 0 {
                    return Err(ChainError::InvalidPolicy {
                        node: spec.sku.clone(),
                        reason: "review_time must be at least 1".to_owned(),
                    });
                }
                if spec.lead_time.is_none() {
                    return Err(ChainError::MissingLeadTime {
                        node: spec.sku.clone(),
                    });
                }
            }
        }

        // ── Phase orderings ───────────────────────────────────────────────
        let mut release_order: Vec<NodeId> =
            (0..node_count).map(|i| NodeId(i as u32)).collect();
        release_order.sort_by_key(|id| (llc[id.index()], id.0));
        let mut order_pass = release_order.clone();
        order_pass.sort_by_key(|id| (Reverse(llc[id.index()]), id.0));

        // ── Materialize nodes, resolving SKU-keyed state ──────────────────
        let mut nodes = Vec::with_capacity(node_count);
        for (i, spec) in self.nodes.into_iter().enumerate() {
            let id = NodeId(i as u32);

            let mut stock = Qty::new();
            for (sku, quantity) in &spec.stock {
                let context = format!("stock of node {}", spec.sku);
                stock.add(resolve(sku, &context)?, *quantity);
            }

            let mut orders = Qty::new();
            for (sku, quantity) in &spec.orders {
                let context = format!("orders of node {}", spec.sku);
                orders.add(resolve(sku, &context)?, *quantity);
            }

            let mut pipeline = Pipeline::new();
            for (sku, eta, quantity) in &spec.pipeline {
                let context = format!("pipeline of node {}", spec.sku);
                pipeline.add(Receipt {
                    sku: resolve(sku, &context)?,
                    eta: *eta,
                    quantity: *quantity,
                });
            }

            nodes.push(Node::new(
                id,
                spec.sku,
                llc[i],
                stock,
                spec.backorders,
                orders,
                pipeline,
                spec.sales.unwrap_or_else(|| Box::new(SalesSchedule::new())),
                spec.lead_time
                    .unwrap_or_else(|| Box::new(LeadTimeSchedule::new())),
                spec.policy,
            ));
        }

        info!(
            nodes = node_count,
            edges = merged.len(),
            max_llc,
            "supply chain constructed"
        );

        Ok(SupplyChain {
            nodes,
            index,
            parents,
            children,
            release_order,
            order_pass,
            max_llc,
        })
    }
}
