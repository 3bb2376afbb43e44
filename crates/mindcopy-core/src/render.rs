//! View renderer: pure projections of the state document into HTML regions.
//! Every function returns the whole region; callers replace the region wholesale.

use crate::docs::DocPanel;
use crate::state::{EntryFields, LogEntry, ModeFlag, Modes, StateDocument};

/// Placeholder shown when the journal has no entries.
pub const EMPTY_ENTRIES: &str = r#"<div class="small">No entries yet.</div>"#;

/// Placeholder shown while an auxiliary document has not arrived.
pub const LOADING: &str = "Loading…";

fn on_off(v: bool) -> &'static str {
    if v {
        "ON"
    } else {
        "OFF"
    }
}

/// Mode badges, one per field.
pub fn render_modes(doc: &StateDocument) -> String {
    let m = &doc.modes;
    let mut out = format!(r#"<span class="badge">Елинор:{}</span>"#, m.elinor);
    for flag in ModeFlag::ALL {
        out.push_str(&format!(
            r#"<span class="badge" data-flag="{}">{}:{}</span>"#,
            flag.as_str(),
            flag.label(),
            on_off(m.flag(flag))
        ));
    }
    out
}

/// Editable profile inputs, followed by the fixed symbols and directives.
pub fn render_profile(doc: &StateDocument) -> String {
    let p = &doc.profile;
    let directives: String = p
        .directives
        .iter()
        .map(|d| format!("<li>{}</li>", html_escape(d)))
        .collect();
    format!(
        r#"<label>Name<input id="mp_name" name="name" value="{}"/></label>
<label>Mission<input id="mp_mission" name="mission" value="{}"/></label>
<label>Voice<input id="mp_voice" name="voice" value="{}"/></label>
<div class="small">Center: {} | Cahetel: {}</div>
<ul class="directives">{}</ul>"#,
        html_escape(&p.name),
        html_escape(&p.mission),
        html_escape(&p.voice),
        html_escape(&p.symbols.center),
        html_escape(&p.symbols.cahetel),
        directives
    )
}

fn modes_line(m: &Modes) -> String {
    let flags: Vec<String> = ModeFlag::ALL
        .iter()
        .map(|f| format!("{}:{}", f.label(), on_off(m.flag(*f))))
        .collect();
    format!("Modes → Елинор:{} | {}", m.elinor, flags.join(" | "))
}

fn render_entry(e: &LogEntry) -> String {
    format!(
        r#"<div class="card">
  <div class="small">{}</div>
  <div class="small">{}</div>
  <hr/>
  <b>Intent:</b> {}<br/>
  <b>Spark:</b> {}<br/>
  <b>Synthesis 3×3</b><br/>• Fact — {}<br/>• Step — {}<br/>• Guard — {}
</div>"#,
        e.ts.format("%Y-%m-%d %H:%M:%S UTC"),
        modes_line(&e.modes),
        html_escape(&e.intent),
        html_escape(&e.spark),
        html_escape(&e.fact),
        html_escape(&e.step),
        html_escape(&e.guard)
    )
}

/// Entry cards in stored order (newest first), or the empty placeholder.
pub fn render_entries(doc: &StateDocument) -> String {
    if doc.entries.is_empty() {
        return EMPTY_ENTRIES.to_string();
    }
    doc.entries.iter().map(render_entry).collect()
}

/// Entry form inputs holding `fields`.
pub fn render_entry_form(fields: &EntryFields) -> String {
    let input = |id: &str, name: &str, label: &str, value: &str| {
        format!(
            r#"<label>{}<input id="lg_{}" name="{}" value="{}"/></label>"#,
            label,
            id,
            name,
            html_escape(value)
        )
    };
    [
        input("intent", "intent", "Intent", &fields.intent),
        input("spark", "spark", "Spark", &fields.spark),
        input("fact", "fact", "Fact", &fields.fact),
        input("step", "step", "Step", &fields.step),
        input("guard", "guard", "Guard", &fields.guard),
    ]
    .join("\n")
}

/// Auxiliary document panel: placeholder until the text arrives.
pub fn render_doc_panel(panel: &DocPanel) -> String {
    match panel {
        DocPanel::Loading => LOADING.to_string(),
        DocPanel::Ready(text) => format!("<pre>{}</pre>", html_escape(text)),
    }
}

/// Escapes HTML so journal text cannot inject markup.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc_with_entry() -> StateDocument {
        let mut doc = StateDocument::default();
        doc.entries.push(LogEntry::new(
            Utc.with_ymd_and_hms(2025, 8, 19, 5, 23, 0).unwrap(),
            doc.modes,
            EntryFields {
                intent: "walk <fast>".into(),
                fact: "rain".into(),
                step: "umbrella".into(),
                ..Default::default()
            },
        ));
        doc
    }

    #[test]
    fn modes_badges_show_level_and_switches() {
        let mut doc = StateDocument::default();
        doc.modes.godmode = true;
        let out = render_modes(&doc);
        assert!(out.contains("Елинор:2"));
        assert!(out.contains("godmode:ON"));
        assert!(out.contains("диня:OFF"));
    }

    #[test]
    fn empty_entries_render_placeholder() {
        let doc = StateDocument::default();
        assert_eq!(render_entries(&doc), EMPTY_ENTRIES);
    }

    #[test]
    fn entries_escape_text_and_show_snapshot() {
        let out = render_entries(&doc_with_entry());
        assert!(out.contains("walk &lt;fast&gt;"));
        assert!(!out.contains("<fast>"));
        assert!(out.contains("2025-08-19 05:23:00 UTC"));
        assert!(out.contains("Modes → Елинор:2"));
    }

    #[test]
    fn synthesis_lines_keep_dash_labels() {
        let out = render_entries(&doc_with_entry());
        assert!(out.contains("• Fact — rain<br/>"));
        assert!(out.contains("• Step — umbrella<br/>"));
        assert!(out.contains("• Guard — \n</div>"));
    }

    #[test]
    fn renderers_are_idempotent() {
        let doc = doc_with_entry();
        assert_eq!(render_modes(&doc), render_modes(&doc));
        assert_eq!(render_profile(&doc), render_profile(&doc));
        assert_eq!(render_entries(&doc), render_entries(&doc));
    }

    #[test]
    fn profile_populates_inputs() {
        let mut doc = StateDocument::default();
        doc.profile.name = "A \"quoted\" name".into();
        let out = render_profile(&doc);
        assert!(out.contains(r#"value="A &quot;quoted&quot; name""#));
        assert!(out.contains("Serve the mission, not the ego."));
    }

    #[test]
    fn blank_form_has_empty_values() {
        let out = render_entry_form(&EntryFields::default());
        assert_eq!(out.matches(r#"value="""#).count(), 5);
    }

    #[test]
    fn doc_panel_loading_then_ready() {
        assert_eq!(render_doc_panel(&DocPanel::Loading), LOADING);
        assert_eq!(
            render_doc_panel(&DocPanel::Ready("# A & B".into())),
            "<pre># A &amp; B</pre>"
        );
    }
}
