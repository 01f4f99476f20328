use crate::suite::TestMethod;

/// One planned invocation of a test method.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor<'a> {
    pub method: &'a TestMethod,
    pub input: Option<&'a str>,
    pub expected: Option<&'a str>,
}

/// Pairs each entry of `params` with the expectation at the same index.
///
/// An empty `params` list still yields one invocation, without arguments,
/// checked against `results[0]` when present. Unannotated methods yield
/// nothing.
pub fn expand(method: &TestMethod) -> Vec<Descriptor<'_>> {
    let Some(annotation) = method.annotation() else {
        return Vec::new();
    };
    let expected_at = move |i: usize| annotation.results.get(i).map(String::as_str);

    if annotation.params.is_empty() {
        return vec![Descriptor {
            method,
            input: None,
            expected: expected_at(0),
        }];
    }
    annotation
        .params
        .iter()
        .enumerate()
        .map(|(i, input)| Descriptor {
            method,
            input: Some(input.as_str()),
            expected: expected_at(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_case;
    use crate::types::TestAnnotation;

    struct Dummy;

    fn method(annotation: Option<TestAnnotation>) -> TestMethod {
        let m = TestMethod::unary("echo", |_: &mut Dummy, s: String| s);
        match annotation {
            Some(a) => m.annotated(a),
            None => m,
        }
    }

    fn pairs(m: &TestMethod) -> Vec<(Option<&str>, Option<&str>)> {
        expand(m).iter().map(|d| (d.input, d.expected)).collect()
    }

    #[test]
    fn aligned_params_and_results() {
        let m = method(Some(test_case!(params = ["10", "5"], results = ["100", "25"])));
        assert_eq!(pairs(&m), vec![(Some("10"), Some("100")), (Some("5"), Some("25"))]);
    }

    #[test]
    fn missing_results_mean_no_expectation() {
        let m = method(Some(test_case!(params = ["a", "b", "c"], results = ["A"])));
        assert_eq!(
            pairs(&m),
            vec![(Some("a"), Some("A")), (Some("b"), None), (Some("c"), None)]
        );
    }

    #[test]
    fn no_params_is_one_bare_call() {
        let m = method(Some(test_case!(results = ["7", "8"])));
        assert_eq!(pairs(&m), vec![(None, Some("7"))]);
        let m = method(Some(test_case!()));
        assert_eq!(pairs(&m), vec![(None, None)]);
    }

    #[test]
    fn surplus_results_are_dropped() {
        let m = method(Some(test_case!(params = ["x"], results = ["X", "Y"])));
        assert_eq!(pairs(&m), vec![(Some("x"), Some("X"))]);
    }

    #[test]
    fn unannotated_methods_expand_to_nothing() {
        assert!(expand(&method(None)).is_empty());
    }
}
