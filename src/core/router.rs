//! Static route table for the app's pages.
//!
//! Paths match case-insensitively and ignore a trailing slash. The
//! `/children/move-more` section is a tabbed layout whose empty child path
//! redirects to the map tab.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Page {
    Home,
    ParentPage,
    ChildrenPage,
    ParentEpic8Insights,
    ParentEpic4Page,
    ParentEpic2,
    ChildrenSleepHabits,
    ChildrenRoutineCoach,
    ChildrenMoveMore,
    MoveMoreMap,
    MoveMoreSleepBoost,
    MoveMoreDaytime,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::ParentPage => "ParentPage",
            Page::ChildrenPage => "ChildrenPage",
            Page::ParentEpic8Insights => "ParentEpic8Insights",
            Page::ParentEpic4Page => "ParentEpic4Page",
            Page::ParentEpic2 => "ParentEpic2",
            Page::ChildrenSleepHabits => "ChildrenSleepHabits",
            Page::ChildrenRoutineCoach => "ChildrenRoutineCoach",
            Page::ChildrenMoveMore => "ChildrenMoveMore",
            Page::MoveMoreMap => "MoveMoreMap",
            Page::MoveMoreSleepBoost => "MoveMoreSleepBoost",
            Page::MoveMoreDaytime => "MoveMoreDaytime",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Page),
    /// Redirect to the named route.
    Redirect(&'static str),
}

#[derive(Debug)]
pub struct Route {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub target: RouteTarget,
    pub children: &'static [Route],
}

impl Route {
    const fn page(path: &'static str, name: &'static str, page: Page) -> Self {
        Self {
            path,
            name: Some(name),
            target: RouteTarget::Page(page),
            children: &[],
        }
    }

    const fn layout(path: &'static str, page: Page, children: &'static [Route]) -> Self {
        Self {
            path,
            name: None,
            target: RouteTarget::Page(page),
            children,
        }
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            name: None,
            target: RouteTarget::Redirect(to),
            children: &[],
        }
    }
}

pub const DEFAULT_MOVE_MORE_TAB: &str = "children-move-more-map";

static MOVE_MORE_TABS: [Route; 4] = [
    Route::redirect("", DEFAULT_MOVE_MORE_TAB),
    Route::page("map", "children-move-more-map", Page::MoveMoreMap),
    Route::page(
        "sleep-boost",
        "children-move-more-sleep-boost",
        Page::MoveMoreSleepBoost,
    ),
    Route::page("daytime", "children-move-more-daytime", Page::MoveMoreDaytime),
];

static ROUTES: [Route; 9] = [
    Route::page("/", "home", Page::Home),
    Route::page("/parent", "parent", Page::ParentPage),
    Route::page("/children", "children", Page::ChildrenPage),
    Route::page("/parent/epic8", "ParentEpic8", Page::ParentEpic8Insights),
    Route::page("/parent/epic4", "ParentEpic4", Page::ParentEpic4Page),
    Route::page("/parent/epic2", "ParentEpic2", Page::ParentEpic2),
    Route::page(
        "/children/sleep-habits",
        "children-sleep-habits",
        Page::ChildrenSleepHabits,
    ),
    Route::page(
        "/children/routine-coach",
        "children-routine-coach",
        Page::ChildrenRoutineCoach,
    ),
    Route::layout("/children/move-more", Page::ChildrenMoveMore, &MOVE_MORE_TABS),
];

pub fn routes() -> &'static [Route] {
    &ROUTES
}

/// A path matched against the table, after following any redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub path: String,
    pub name: Option<&'static str>,
    /// Matched pages, outermost layout first.
    pub pages: Vec<Page>,
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    /// The innermost page, the one that fills the view.
    pub fn page(&self) -> Option<Page> {
        self.pages.last().copied()
    }
}

// Redirect chains in the table are one hop; the cap only guards against edits.
const MAX_REDIRECTS: usize = 4;

pub fn resolve(path: &str) -> Option<ResolvedRoute> {
    let requested = normalize_path(path);
    let mut current = requested.clone();

    for _ in 0..=MAX_REDIRECTS {
        match match_path(&current)? {
            Matched::Pages { name, pages } => {
                let redirected_from = (current != requested).then(|| requested.clone());
                return Some(ResolvedRoute {
                    path: current,
                    name,
                    pages,
                    redirected_from,
                });
            }
            Matched::Redirect(to) => {
                tracing::debug!("Route {} redirects to '{}'", current, to);
                current = path_for(to)?;
            }
        }
    }

    tracing::warn!("Redirect loop while resolving {}", requested);
    None
}

/// Full path of a named route.
pub fn path_for(name: &str) -> Option<String> {
    for route in routes() {
        if route.name == Some(name) {
            return Some(route.path.to_string());
        }
        for child in route.children {
            if child.name == Some(name) {
                return Some(join(route.path, child.path));
            }
        }
    }
    None
}

enum Matched {
    Pages {
        name: Option<&'static str>,
        pages: Vec<Page>,
    },
    Redirect(&'static str),
}

fn match_path(path: &str) -> Option<Matched> {
    for route in routes() {
        if route.children.is_empty() {
            if route.path.eq_ignore_ascii_case(path) {
                return Some(target_match(route, Vec::new()));
            }
            continue;
        }

        let Some(rest) = strip_prefix_ignore_case(path, route.path) else {
            continue;
        };
        let rest = match rest {
            "" => "",
            r => match r.strip_prefix('/') {
                Some(r) => r,
                None => continue,
            },
        };
        let parents = match route.target {
            RouteTarget::Page(page) => vec![page],
            RouteTarget::Redirect(to) => return Some(Matched::Redirect(to)),
        };
        if let Some(child) = route
            .children
            .iter()
            .find(|child| child.path.eq_ignore_ascii_case(rest))
        {
            return Some(target_match(child, parents));
        }
    }
    None
}

fn target_match(route: &Route, mut pages: Vec<Page>) -> Matched {
    match route.target {
        RouteTarget::Page(page) => {
            pages.push(page);
            Matched::Pages {
                name: route.name,
                pages,
            }
        }
        RouteTarget::Redirect(to) => Matched::Redirect(to),
    }
}

fn strip_prefix_ignore_case<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &path[prefix.len()..])
}

fn join(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}

/// Drop query and fragment, ensure a leading slash, strip trailing slashes.
fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_routes() {
        let home = resolve("/").unwrap();
        assert_eq!(home.name, Some("home"));
        assert_eq!(home.pages, vec![Page::Home]);

        let epic8 = resolve("/parent/epic8").unwrap();
        assert_eq!(epic8.page(), Some(Page::ParentEpic8Insights));
        assert_eq!(epic8.redirected_from, None);
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(resolve("").unwrap().page(), Some(Page::Home));
        assert_eq!(resolve("/parent/").unwrap().page(), Some(Page::ParentPage));
        assert_eq!(
            resolve("/Children/Sleep-Habits?from=home#top").unwrap().page(),
            Some(Page::ChildrenSleepHabits)
        );
        assert_eq!(resolve("children").unwrap().page(), Some(Page::ChildrenPage));
    }

    #[test]
    fn test_move_more_default_tab_redirect() {
        let resolved = resolve("/children/move-more").unwrap();
        assert_eq!(resolved.path, "/children/move-more/map");
        assert_eq!(resolved.name, Some("children-move-more-map"));
        assert_eq!(resolved.pages, vec![Page::ChildrenMoveMore, Page::MoveMoreMap]);
        assert_eq!(
            resolved.redirected_from.as_deref(),
            Some("/children/move-more")
        );

        let with_slash = resolve("/children/move-more/").unwrap();
        assert_eq!(with_slash.page(), Some(Page::MoveMoreMap));
    }

    #[test]
    fn test_move_more_tabs() {
        let resolved = resolve("/children/move-more/sleep-boost").unwrap();
        assert_eq!(
            resolved.pages,
            vec![Page::ChildrenMoveMore, Page::MoveMoreSleepBoost]
        );
        assert_eq!(resolved.name, Some("children-move-more-sleep-boost"));

        let daytime = resolve("/children/move-more/daytime").unwrap();
        assert_eq!(daytime.page(), Some(Page::MoveMoreDaytime));
    }

    #[test]
    fn test_unknown_paths() {
        assert!(resolve("/nowhere").is_none());
        assert!(resolve("/children/move-more/unknown").is_none());
        assert!(resolve("/children/move-moreish").is_none());
        assert!(resolve("/parent/epic8/extra").is_none());
    }

    #[test]
    fn test_path_for_named_routes() {
        assert_eq!(path_for("home").as_deref(), Some("/"));
        assert_eq!(path_for("ParentEpic2").as_deref(), Some("/parent/epic2"));
        assert_eq!(
            path_for("children-move-more-daytime").as_deref(),
            Some("/children/move-more/daytime")
        );
        assert_eq!(path_for("missing"), None);
    }

    #[test]
    fn test_every_named_route_resolves_to_itself() {
        for route in routes() {
            let names = route
                .name
                .into_iter()
                .chain(route.children.iter().filter_map(|c| c.name));
            for name in names {
                let path = path_for(name).unwrap();
                assert_eq!(resolve(&path).unwrap().name, Some(name), "{}", path);
            }
        }
    }
}
