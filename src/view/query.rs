//! Identifier lookup and typed property accessors.
//!
//! Accessors take a starting view and an optional sub-view path. An empty
//! path reads `view` itself; otherwise the path is resolved with
//! [`view_by_id`] below `view` first. A missing view or a kind without the
//! tag reads as `None`.

use super::node::ViewId;
use crate::session::Session;
use crate::value::{Color, Date, EnumValue, TimeOfDay, Value};

/// First view in pre-order under `root` (inclusive) whose identifier is
/// `path`. `a/b` resolves `b` inside the first `a`.
pub fn view_by_id(session: &Session, root: ViewId, path: &str) -> Option<ViewId> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |from, segment| find(session, from, segment))
}

fn find(session: &Session, from: ViewId, id: &str) -> Option<ViewId> {
    let tree = session.tree();
    tree.walk_depth_first(from)
        .into_iter()
        .find(|&view| tree.get(view).is_some_and(|data| data.has_id(id)))
}

impl Session {
    /// [`view_by_id`] from the root.
    pub fn view_by_id(&self, path: &str) -> Option<ViewId> {
        view_by_id(self, self.root()?, path)
    }
}

fn read(session: &Session, view: ViewId, subview: &str, tag: &str) -> Option<Value> {
    let target = if subview.is_empty() {
        view
    } else {
        view_by_id(session, view, subview)?
    };
    session.get(target, tag).ok()
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

/// Selected index of a `DropDownList`.
pub fn get_drop_down_current(session: &Session, view: ViewId, subview: &str) -> Option<i64> {
    read(session, view, subview, "current")?.as_int()
}

pub fn get_text(session: &Session, view: ViewId, subview: &str) -> Option<String> {
    read(session, view, subview, "text")?.as_str().map(str::to_owned)
}

pub fn get_progress_bar_max(session: &Session, view: ViewId, subview: &str) -> Option<f64> {
    read(session, view, subview, "progress-max")?.as_float()
}

pub fn get_progress_bar_value(session: &Session, view: ViewId, subview: &str) -> Option<f64> {
    read(session, view, subview, "progress-value")?.as_float()
}

pub fn is_checked(session: &Session, view: ViewId, subview: &str) -> Option<bool> {
    read(session, view, subview, "checked")?.as_bool()
}

pub fn get_number_picker_value(session: &Session, view: ViewId, subview: &str) -> Option<f64> {
    read(session, view, subview, "number-picker-value")?.as_float()
}

pub fn get_color_picker_value(session: &Session, view: ViewId, subview: &str) -> Option<Color> {
    read(session, view, subview, "color-picker-value")?.as_color()
}

pub fn get_date_picker_value(session: &Session, view: ViewId, subview: &str) -> Option<Date> {
    match read(session, view, subview, "date-picker-value")? {
        Value::Date(date) => Some(date),
        _ => None,
    }
}

pub fn get_time_picker_value(session: &Session, view: ViewId, subview: &str) -> Option<TimeOfDay> {
    match read(session, view, subview, "time-picker-value")? {
        Value::Time(time) => Some(time),
        _ => None,
    }
}

/// Selected item of a `ListView`; `-1` when nothing is selected.
pub fn get_list_view_current(session: &Session, view: ViewId, subview: &str) -> Option<i64> {
    read(session, view, subview, "current")?.as_int()
}

pub fn is_disabled(session: &Session, view: ViewId, subview: &str) -> Option<bool> {
    read(session, view, subview, "disabled")?.as_bool()
}

/// `visible`, `invisible` or `gone`.
pub fn get_visibility(session: &Session, view: ViewId, subview: &str) -> Option<EnumValue> {
    read(session, view, subview, "visibility")?.as_enum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// ```text
    ///        root (ListLayout)
    ///       /            \
    ///   form #a          other #a
    ///   /     \             |
    ///  #b     #check       #b
    /// ```
    fn build() -> (Session, ViewId) {
        let mut session = Session::new(1);
        let realized = session
            .realize_source(
                "ListLayout { content = [
                    ListLayout { id = a, content = [
                        TextView { id = b, text = first },
                        Checkbox { id = check, checked = true },
                    ] },
                    ListLayout { id = a, content = TextView { id = b, text = second } },
                    ProgressBar { id = bar, progress-value = 0.25 },
                ] }",
            )
            .unwrap();
        assert!(realized.diagnostics.is_empty(), "{:?}", realized.diagnostics);
        session.set_root(realized.root).unwrap();
        (session, realized.root)
    }

    // ── Lookup ───────────────────────────────────────────────────────

    #[test]
    fn first_in_pre_order_wins() {
        let (s, root) = build();
        let b = view_by_id(&s, root, "b").unwrap();
        assert_eq!(get_text(&s, b, ""), Some("first".into()));
    }

    #[test]
    fn root_itself_is_searched() {
        let (mut s, root) = build();
        s.set(root, "id", "top").unwrap();
        assert_eq!(view_by_id(&s, root, "top"), Some(root));
    }

    #[test]
    fn path_resolves_inside_first_match() {
        let (s, _) = build();
        let b = s.view_by_id("a/b").unwrap();
        assert_eq!(get_text(&s, b, ""), Some("first".into()));
        assert!(s.view_by_id("a/missing").is_none());
        assert!(s.view_by_id("nope").is_none());
    }

    // ── Accessors ────────────────────────────────────────────────────

    #[test]
    fn accessors_read_through_subview_paths() {
        let (s, root) = build();
        assert_eq!(is_checked(&s, root, "a/check"), Some(true));
        assert_eq!(get_progress_bar_value(&s, root, "bar"), Some(0.25));
        assert_eq!(get_progress_bar_max(&s, root, "bar"), Some(1.0));
        assert_eq!(is_disabled(&s, root, "bar"), Some(false));
        assert_eq!(get_visibility(&s, root, "bar").map(|v| v.name), Some("visible"));
    }

    #[test]
    fn wrong_kind_reads_none() {
        let (s, root) = build();
        assert_eq!(is_checked(&s, root, "bar"), None);
        assert_eq!(get_drop_down_current(&s, root, "ghost"), None);
    }
}
