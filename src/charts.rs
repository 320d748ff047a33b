//! Chart data and SVG rendering for a batch of analysed posts.

use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::pipeline::PostRecord;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Charts {
    /// Polarity per post, in input order.
    pub polarity_trend: Vec<f64>,
    /// Post count per emotion label.
    pub emotion_distribution: BTreeMap<String, usize>,
    pub polarity_svg: String,
    pub emotion_svg: String,
}

impl Charts {
    pub fn from_posts(posts: &[PostRecord]) -> Self {
        let polarity_trend = polarity_trend(posts);
        let emotion_distribution = emotion_distribution(posts);
        Self {
            polarity_svg: render_polarity_svg(&polarity_trend),
            emotion_svg: render_emotion_svg(&emotion_distribution),
            polarity_trend,
            emotion_distribution,
        }
    }
}

pub fn polarity_trend(posts: &[PostRecord]) -> Vec<f64> {
    posts.iter().map(|p| p.polarity).collect()
}

pub fn emotion_distribution(posts: &[PostRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for post in posts {
        *counts.entry(post.emotion_label.clone()).or_insert(0) += 1;
    }
    counts
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn open_svg(out: &mut String, title: &str) {
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    out.push_str(&format!(
        r#"<text x="{}" y="24" text-anchor="middle" font-size="15">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    ));
}

/// Polarity value to y pixel; -1 at the bottom of the plot, 1 at the top.
fn polarity_y(value: f64) -> f64 {
    MARGIN_TOP + (1.0 - value.clamp(-1.0, 1.0)) / 2.0 * plot_height()
}

pub fn render_polarity_svg(values: &[f64]) -> String {
    let mut out = String::new();
    open_svg(&mut out, "Sentiment Polarity Trend");

    let bottom = MARGIN_TOP + plot_height();
    let right = MARGIN_LEFT + plot_width();
    out.push_str(&format!(
        r##"<line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="#333"/><line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="#333"/>"##,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom,
        r = right
    ));
    for tick in [-1.0, -0.5, 0.0, 0.5, 1.0] {
        out.push_str(&format!(
            r#"<text x="{}" y="{:.1}" text-anchor="end">{:.1}</text>"#,
            MARGIN_LEFT - 6.0,
            polarity_y(tick) + 4.0,
            tick
        ));
    }

    let zero = polarity_y(0.0);
    out.push_str(&format!(
        r#"<line class="zero" x1="{}" y1="{:.1}" x2="{}" y2="{:.1}" stroke="gray" stroke-dasharray="6,4"/>"#,
        MARGIN_LEFT, zero, right, zero
    ));

    let step = if values.len() > 1 {
        plot_width() / (values.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |i: usize| {
        if values.len() > 1 {
            MARGIN_LEFT + step * i as f64
        } else {
            MARGIN_LEFT + plot_width() / 2.0
        }
    };

    if values.len() > 1 {
        let points: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), polarity_y(*v)))
            .collect();
        out.push_str(&format!(
            r##"<polyline fill="none" stroke="#1f77b4" stroke-width="2" points="{}"/>"##,
            points.join(" ")
        ));
    }
    for (i, v) in values.iter().enumerate() {
        out.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#1f77b4"><title>Post {}: {:.2}</title></circle>"##,
            x_at(i),
            polarity_y(*v),
            i,
            v
        ));
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{}" text-anchor="middle">{}</text>"#,
            x_at(i),
            bottom + 16.0,
            i
        ));
    }

    out.push_str(&format!(
        r#"<text x="{}" y="{}" text-anchor="middle">Post Index</text>"#,
        MARGIN_LEFT + plot_width() / 2.0,
        HEIGHT - 10.0
    ));
    out.push_str(&format!(
        r#"<text x="16" y="{y}" text-anchor="middle" transform="rotate(-90 16 {y})">Polarity (-1 to 1)</text>"#,
        y = MARGIN_TOP + plot_height() / 2.0
    ));
    out.push_str("</svg>");
    out
}

pub fn render_emotion_svg(counts: &BTreeMap<String, usize>) -> String {
    let mut out = String::new();
    open_svg(&mut out, "Emotion Frequency");

    let bottom = MARGIN_TOP + plot_height();
    out.push_str(&format!(
        r##"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="#333"/>"##,
        l = MARGIN_LEFT,
        b = bottom,
        r = MARGIN_LEFT + plot_width()
    ));

    let max = counts.values().copied().max().unwrap_or(0);
    if max > 0 {
        let slot = plot_width() / counts.len() as f64;
        let bar_width = slot * 0.6;
        for (i, (label, count)) in counts.iter().enumerate() {
            let bar_height = *count as f64 / max as f64 * plot_height();
            let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
            let y = bottom - bar_height;
            let center = x + bar_width / 2.0;
            out.push_str(&format!(
                r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#1f77b4"><title>{}: {}</title></rect>"##,
                x,
                y,
                bar_width,
                bar_height,
                escape(label),
                count
            ));
            out.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                center,
                y - 4.0,
                count
            ));
            out.push_str(&format!(
                r#"<text x="{:.1}" y="{}" text-anchor="middle">{}</text>"#,
                center,
                bottom + 16.0,
                escape(label)
            ));
        }
    }

    out.push_str("</svg>");
    out
}
