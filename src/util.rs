//! Various utilities.

use log::error;

/// Logs an error, including its causes and backtrace (if possible).
pub fn log_err(err: &failure::Error) {
    let mut first = true;
    let num_errs = err.iter_chain().count();
    if num_errs <= 1 {
        error!("{}", err);
    } else {
        for cause in err.iter_chain() {
            if first {
                first = false;
                error!("           {}", cause);
            } else {
                error!("caused by: {}", cause);
            }
        }
    }
    let bt = err.backtrace().to_string();
    if bt != "" {
        error!("{}", bt);
    }
}

/// Turns a name into something that can be used in a URL or as a username: lowercase ASCII
/// letters and digits, with runs of anything else collapsed to a single dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        let ch = match ch {
            'ä' => "ae",
            'ö' => "oe",
            'ü' => "ue",
            'ß' => "ss",
            ch if ch.is_ascii_alphanumeric() => {
                slug.push(ch);
                continue;
            }
            _ => "-",
        };
        if ch == "-" && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push_str(ch);
    }
    while slug.ends_with('-') {
        let _ = slug.pop();
    }
    slug
}

/// The type of a responder. Since `impl Trait` can't be used in `type` items, this magics one up.
macro_rules! Resp {
    () => { warp::filters::BoxedFilter<(impl warp::Reply,)> };
}

/// Inserts `.or(...)` between the given routes. Each route is a method, a `warp::path!` pattern
/// and a handler; the handler gets the path parameters, then the value extracted by `$state`,
/// then (for `POST`) the submitted form.
macro_rules! route_any {
    ($state:ident; $hm:ident $hp:tt => $h:expr $(, $tm:ident $tp:tt => $t:expr)* $(,)*) => {
        route_any!(@internal $state; $hm $hp => $h)
            $(.or(route_any!(@internal $state; $tm $tp => $t)))*
    };

    (@internal $state:ident; GET $p:tt => $h:expr) => {{
        use warp::path;
        warp::get()
            .and(path! $p)
            .and($state.clone())
            .and_then($h)
    }};
    (@internal $state:ident; POST $p:tt => $h:expr) => {{
        use warp::path;
        warp::post()
            .and(path! $p)
            .and($state.clone())
            .and($crate::router::util::form_body())
            .and_then($h)
    }};
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugs() {
        assert_eq!(slugify("Bad 2. OG"), "bad-2-og");
        assert_eq!(slugify("  Küche / Bar "), "kueche-bar");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("---"), "");
    }
}
