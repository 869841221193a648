use crate::ctx::FunctionCtx;
use http::Uri;
use url::form_urlencoded;

/// Query String API
///
/// Keys and values are percent-decoded (`+` as space) before comparison.
impl<B, W> FunctionCtx<B, W> {
    /// True if the parameter appears at all, even as `?flag` or `?flag=`.
    pub fn has_query_parameter(&self, name: &str) -> bool {
        query_pairs(self.request.uri()).any(|(key, _)| key == name)
    }

    /// First value of the parameter, or `""` when absent.
    pub fn query_parameter(&self, name: &str) -> String {
        query_pairs(self.request.uri())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    }

    /// Every value of a repeated parameter, in request order.
    pub fn query_parameters(&self, name: &str) -> Vec<String> {
        query_pairs(self.request.uri())
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .collect()
    }
}

fn query_pairs(uri: &Uri) -> form_urlencoded::Parse<'_> {
    form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
}
