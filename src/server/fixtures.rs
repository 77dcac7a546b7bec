//! Canned payloads for the graph and analytics views. These are demo
//! data for the dashboard; they ignore which job is asked about.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLink {
    pub source: &'static str,
    pub target: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    pub url: &'static str,
    pub status: u16,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub depth: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub depth_histogram: BTreeMap<&'static str, u64>,
    pub mime_histogram: BTreeMap<&'static str, u64>,
    pub response_timeline: BTreeMap<&'static str, u32>,
    pub status_rows: Vec<StatusRow>,
}

pub fn demo_graph() -> GraphResponse {
    let node = |id, label, kind| GraphNode { id, label, kind };
    let link = |source, target| GraphLink { source, target };
    GraphResponse {
        nodes: vec![
            node("home", "Home", "home"),
            node("blog", "Blog", "internal"),
            node("pricing", "Pricing", "internal"),
            node("status", "Status", "internal"),
            node("404", "404", "error"),
            node("external-docs", "Docs", "external"),
        ],
        links: vec![
            link("home", "blog"),
            link("home", "pricing"),
            link("home", "status"),
            link("blog", "404"),
            link("blog", "external-docs"),
            link("pricing", "status"),
        ],
    }
}

pub fn demo_analytics() -> AnalyticsResponse {
    let row = |url, status, kind, depth| StatusRow {
        url,
        status,
        kind,
        depth,
    };
    AnalyticsResponse {
        depth_histogram: BTreeMap::from([
            ("1", 58),
            ("2", 142),
            ("3", 310),
            ("4", 210),
            ("5+", 89),
        ]),
        mime_histogram: BTreeMap::from([
            ("HTML", 480),
            ("Images", 210),
            ("CSS", 66),
            ("JS", 128),
        ]),
        response_timeline: BTreeMap::from([
            ("t0", 180),
            ("t1", 220),
            ("t2", 160),
            ("t3", 210),
            ("t4", 260),
            ("t5", 190),
            ("t6", 205),
            ("t7", 175),
        ]),
        status_rows: vec![
            row("/", 200, "HTML", 1),
            row("/blog", 200, "HTML", 2),
            row("/blog/legacy", 404, "HTML", 3),
            row("/api/internal", 500, "JSON", 2),
            row("/pricing", 200, "HTML", 2),
            row("/cdn/logo.png", 200, "Image", 2),
            row("/static/old.css", 301, "CSS", 3),
        ],
    }
}
