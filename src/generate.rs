//! Annotation generation.
//!
//! Decides which of the three canonical annotations (`run`, `dispatch`,
//! `dispatchOn`) a class's doc comment should carry, based on its capability
//! flags and handler method, and produces the updated line list. Annotation
//! lines for anything else pass through untouched.

use crate::docblock::{self, DocBlockProcessor};
use crate::types::{CapabilityFlags, MethodInfo, Relation};

pub const METHOD_RUN: &str = "run";
pub const METHOD_DISPATCH: &str = "dispatch";
pub const METHOD_DISPATCH_ON: &str = "dispatchOn";

/// Produce the new annotation-line list for a class.
///
/// Each canonical annotation is governed independently: it is removed when
/// its capability flag is off or the handler is missing, and synthesized or
/// replaced (in place) otherwise.
pub fn generate_doc_blocks(
    flags: CapabilityFlags,
    handler: Option<&MethodInfo>,
    current_lines: Vec<String>,
    usings: &[Relation],
) -> Vec<String> {
    let mut processor = DocBlockProcessor::new(current_lines);

    processor.remove_method_if(METHOD_RUN, !flags.supports_run || handler.is_none());
    processor.remove_method_if(METHOD_DISPATCH, !flags.supports_dispatch || handler.is_none());
    processor.remove_method_if(METHOD_DISPATCH_ON, !flags.supports_dispatch || handler.is_none());

    if let Some(handler) = handler {
        if flags.supports_run {
            processor.add_or_replace_method(METHOD_RUN, Some(build_run_line(handler, usings)));
        }

        if flags.supports_dispatch {
            processor
                .add_or_replace_method(METHOD_DISPATCH, Some(build_dispatch_line(handler, usings)));
            processor.add_or_replace_method(
                METHOD_DISPATCH_ON,
                Some(build_dispatch_on_line(handler, usings)),
            );
        }
    }

    processor.into_lines()
}

/// `@method static {return} run({params})` — forwards the handler signature.
fn build_run_line(handler: &MethodInfo, usings: &[Relation]) -> String {
    docblock::build_method_line(
        "static",
        &docblock::format_return_type(&handler.return_types, usings),
        METHOD_RUN,
        &docblock::format_parameters(&handler.parameters, usings),
    )
}

/// `@method static void dispatch({params})` — queued execution returns
/// nothing regardless of the handler's return type.
fn build_dispatch_line(handler: &MethodInfo, usings: &[Relation]) -> String {
    docblock::build_method_line(
        "static",
        "void",
        METHOD_DISPATCH,
        &docblock::format_parameters(&handler.parameters, usings),
    )
}

/// `@method static void dispatchOn(string $queue, {params})` — the queue
/// name leads, then the handler parameters.
fn build_dispatch_on_line(handler: &MethodInfo, usings: &[Relation]) -> String {
    let parameters = docblock::format_parameters(&handler.parameters, usings);
    let queue_parameter = "string $queue";

    let combined = if parameters.is_empty() {
        queue_parameter.to_string()
    } else {
        format!("{}, {}", queue_parameter, parameters)
    };

    docblock::build_method_line("static", "void", METHOD_DISPATCH_ON, &combined)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::parse_union_type;
    use crate::types::{DefaultValue, ParameterInfo, Visibility};

    fn handler(return_type: &str, params: &[(&str, &str)]) -> MethodInfo {
        let parameters = params
            .iter()
            .enumerate()
            .map(|(position, (name, raw_type))| ParameterInfo {
                name: name.to_string(),
                raw_type: raw_type.to_string(),
                types: parse_union_type(raw_type),
                is_optional: false,
                is_variadic: false,
                is_by_reference: false,
                default: None,
                position,
            })
            .collect();

        MethodInfo {
            name: "handle".to_string(),
            raw_return_type: return_type.to_string(),
            return_types: parse_union_type(return_type),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            parameters,
        }
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    const RUN_ONLY: CapabilityFlags = CapabilityFlags {
        supports_run: true,
        supports_dispatch: false,
    };
    const DISPATCH_ONLY: CapabilityFlags = CapabilityFlags {
        supports_run: false,
        supports_dispatch: true,
    };
    const BOTH: CapabilityFlags = CapabilityFlags {
        supports_run: true,
        supports_dispatch: true,
    };

    #[test]
    fn runnable_handler_synthesizes_run_annotation() {
        let handle = handler("array", &[("type", "string")]);
        let result = generate_doc_blocks(RUN_ONLY, Some(&handle), vec![], &[]);
        assert_eq!(result, lines(&["@method static array run(string $type)"]));
    }

    #[test]
    fn dispatchable_handler_synthesizes_dispatch_pair() {
        let handle = handler("void", &[]);
        let result = generate_doc_blocks(DISPATCH_ONLY, Some(&handle), vec![], &[]);
        assert_eq!(
            result,
            lines(&[
                "@method static void dispatch()",
                "@method static void dispatchOn(string $queue)",
            ])
        );
    }

    #[test]
    fn dispatch_on_forwards_handler_parameters_after_queue() {
        let handle = handler("void", &[("queueArg", "string"), ("x", "Ns\\Foo")]);
        let result = generate_doc_blocks(DISPATCH_ONLY, Some(&handle), vec![], &[]);
        assert_eq!(
            result[1],
            "@method static void dispatchOn(string $queue, string $queueArg, \\Ns\\Foo $x)"
        );
    }

    #[test]
    fn both_capabilities_produce_all_three() {
        let handle = handler("void", &[]);
        let result = generate_doc_blocks(BOTH, Some(&handle), vec![], &[]);
        assert_eq!(
            result,
            lines(&[
                "@method static void run()",
                "@method static void dispatch()",
                "@method static void dispatchOn(string $queue)",
            ])
        );
    }

    #[test]
    fn missing_handler_removes_all_canonical_annotations() {
        let current = lines(&[
            "Hand-written summary",
            "@method static void run()",
            "@method static void dispatch()",
            "@method static void dispatchOn(string $queue)",
            "@method static void somethingElse()",
        ]);
        let result = generate_doc_blocks(BOTH, None, current, &[]);
        assert_eq!(
            result,
            lines(&["Hand-written summary", "@method static void somethingElse()"])
        );
    }

    #[test]
    fn dropped_capability_removes_only_its_annotations() {
        let handle = handler("void", &[]);
        let current = lines(&[
            "@method static void run()",
            "@method static void dispatch()",
            "@method static void dispatchOn(string $queue)",
        ]);
        let result = generate_doc_blocks(DISPATCH_ONLY, Some(&handle), current, &[]);
        assert_eq!(
            result,
            lines(&[
                "@method static void dispatch()",
                "@method static void dispatchOn(string $queue)",
            ])
        );
    }

    #[test]
    fn stale_annotation_is_replaced_in_place() {
        let handle = handler("void", &[("fresh", "int")]);
        let current = lines(&[
            "@method static void run(string $stale)",
            "Trailing note",
        ]);
        let result = generate_doc_blocks(RUN_ONLY, Some(&handle), current, &[]);
        assert_eq!(
            result,
            lines(&["@method static void run(int $fresh)", "Trailing note"])
        );
    }

    #[test]
    fn nullable_return_renders_null_union() {
        let handle = handler("?string", &[]);
        let result = generate_doc_blocks(RUN_ONLY, Some(&handle), vec![], &[]);
        assert_eq!(result, lines(&["@method static string|null run()"]));
    }

    #[test]
    fn default_values_survive_generation() {
        let mut handle = handler("void", &[("mode", "string")]);
        handle.parameters[0].default = Some(DefaultValue::Str("fast".to_string()));
        handle.parameters[0].is_optional = true;

        let result = generate_doc_blocks(RUN_ONLY, Some(&handle), vec![], &[]);
        assert_eq!(result, lines(&["@method static void run(string $mode = 'fast')"]));
    }
}
