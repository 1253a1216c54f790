//! Parameter merge steps.
//!
//! Each step fills gaps in a draft's parameter list without touching what the
//! author wrote: a name that is already documented is only augmented, never
//! duplicated or overwritten.

use crate::config::{PagingConfig, RequestConfig};
use crate::draft::{formats, OperationDraft, Parameter, ParameterLocation, ParameterType};
use crate::route::{ArgumentType, Route};
use http::Method;

pub const LOCALE_DESCRIPTION: &str = "request locale to be sent. for example en, fa, fr ...";
pub const TIMEZONE_DESCRIPTION: &str = "request timezone to be sent. for example UTC, Asia/Tehran ...";
pub const PAGE_DESCRIPTION: &str = "page number to be get.";
pub const PAGE_SIZE_DESCRIPTION: &str = "page size to be get.";

/// Optional attributes of a parameter added by [`add_if_absent`].
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub required: bool,
    pub description: Option<String>,
    pub format: Option<String>,
    pub insert_at_front: bool,
}

/// Find the parameter documented under `name`, if any.
pub fn locate<'a>(name: &str, parameters: &'a [Parameter]) -> Option<&'a Parameter> {
    parameters.iter().find(|p| p.name == name)
}

fn locate_mut<'a>(name: &str, parameters: &'a mut [Parameter]) -> Option<&'a mut Parameter> {
    parameters.iter_mut().find(|p| p.name == name)
}

/// Add a parameter unless one with the same name exists.
///
/// # Arguments
///
/// * `parameters` - The draft's parameter list, in document order
/// * `name` - Parameter name; an existing entry with this name is left untouched
/// * `param_type` - Documented type, omitted from the entry when `None`
/// * `location` - Value of the `in` field
/// * `options` - Required flag, description, format and whether to prepend
///
/// # Returns
///
/// `true` if the parameter was added, `false` if the name was already present.
pub fn add_if_absent(
    parameters: &mut Vec<Parameter>,
    name: &str,
    param_type: Option<ParameterType>,
    location: ParameterLocation,
    options: AddOptions,
) -> bool {
    if locate(name, parameters).is_some() {
        return false;
    }
    let parameter = Parameter {
        name: name.to_string(),
        location: Some(location),
        required: Some(options.required),
        param_type,
        format: options.format,
        description: options.description,
        ..Parameter::default()
    };
    if options.insert_at_front {
        parameters.insert(0, parameter);
    } else {
        parameters.push(parameter);
    }
    true
}

/// Path arguments live in the path; safe verbs carry the rest in the query, others in a JSON body.
pub fn resolve_location(name: &str, route: &Route, verb: &Method) -> ParameterLocation {
    if route.has_argument(name) {
        ParameterLocation::Path
    } else if matches!(*verb, Method::GET | Method::HEAD | Method::OPTIONS) {
        ParameterLocation::Query
    } else {
        ParameterLocation::Json
    }
}

/// Documented type and format of a path argument.
pub fn infer_type(argument: ArgumentType) -> (Option<ParameterType>, Option<&'static str>) {
    match argument {
        ArgumentType::Integer => (Some(ParameterType::Integer), None),
        ArgumentType::Float => (Some(ParameterType::Number), Some(formats::FLOAT)),
        ArgumentType::String => (Some(ParameterType::String), None),
        ArgumentType::Uuid => (Some(ParameterType::String), Some(formats::UUID)),
        ArgumentType::Other => (None, None),
    }
}

/// Make every path argument and declared required argument a required parameter.
///
/// Missing names are inserted at the front, path arguments in rule order. A
/// name the author already documented is forced to `required: true` and only
/// gets `in`, `type` and `format` where those are absent. Path arguments take
/// their type from the rule's converter (`<int:id>` is an `integer`).
///
/// # Arguments
///
/// * `route` - Supplies the required names and argument converters
/// * `verb` - Decides between `query` and `json` for non-path names
/// * `draft` - The operation being assembled
pub fn reconcile_required_parameters(route: &Route, verb: &Method, mut draft: OperationDraft) -> OperationDraft {
    // Front insertion reverses order; walk backwards so path arguments stay in rule order.
    for name in route.required_names().iter().rev() {
        let location = resolve_location(name, route, verb);
        let (param_type, format) = match (location, route.argument_type(name)) {
            (ParameterLocation::Path, Some(arg)) => infer_type(arg),
            _ => (None, None),
        };

        let added = add_if_absent(
            &mut draft.parameters,
            name,
            param_type,
            location,
            AddOptions {
                required: true,
                format: format.map(str::to_string),
                insert_at_front: true,
                ..AddOptions::default()
            },
        );
        if added {
            continue;
        }
        if let Some(existing) = locate_mut(name, &mut draft.parameters) {
            existing.required = Some(true);
            existing.location.get_or_insert(location);
            if existing.param_type.is_none() {
                existing.param_type = param_type;
            }
            if existing.format.is_none() {
                existing.format = format.map(str::to_string);
            }
        }
    }
    draft
}

/// Give every other named parameter `required: false` and a location, unless set.
pub fn reconcile_optional_parameters(route: &Route, verb: &Method, mut draft: OperationDraft) -> OperationDraft {
    let required = route.required_names();
    for parameter in draft.parameters.iter_mut() {
        // `$ref` entries have no name to reconcile.
        if parameter.name.is_empty() || required.contains(&parameter.name) {
            continue;
        }
        parameter.required.get_or_insert(false);
        if parameter.location.is_none() {
            parameter.location = Some(resolve_location(&parameter.name, route, verb));
        }
    }
    draft
}

/// Add the optional `locale` and `timezone` query strings, named by `request`.
///
/// Running this twice leaves a single entry of each.
pub fn inject_locale_and_timezone(request: &RequestConfig, mut draft: OperationDraft) -> OperationDraft {
    for (name, description) in [
        (&request.locale_param, LOCALE_DESCRIPTION),
        (&request.timezone_param, TIMEZONE_DESCRIPTION),
    ] {
        add_if_absent(
            &mut draft.parameters,
            name,
            Some(ParameterType::String),
            ParameterLocation::Query,
            AddOptions {
                description: Some(description.to_string()),
                ..AddOptions::default()
            },
        );
    }
    draft
}

/// Add optional integer `page` and `page_size` query parameters to paged routes.
///
/// Names come from `paging`. Routes that are not paged are returned unchanged.
pub fn inject_paging_parameters(route: &Route, paging: &PagingConfig, mut draft: OperationDraft) -> OperationDraft {
    if !route.is_paged {
        return draft;
    }
    for (name, description) in [
        (&paging.page, PAGE_DESCRIPTION),
        (&paging.page_size, PAGE_SIZE_DESCRIPTION),
    ] {
        add_if_absent(
            &mut draft.parameters,
            name,
            Some(ParameterType::Integer),
            ParameterLocation::Query,
            AddOptions {
                description: Some(description.to_string()),
                ..AddOptions::default()
            },
        );
    }
    draft
}
