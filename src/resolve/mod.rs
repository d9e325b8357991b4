//! Resolver (C5): walks every parsed file, builds a per-file
//! [`ResolutionContext`], classifies each call site, and emits
//! [`ResolvedCall`] edges. Unresolvable calls are dropped, never guessed
//! (SPEC_FULL.md §4.5, §7).

pub mod context;
pub mod overload;
pub mod reexport;
pub mod stdlib;

use crate::error::Diagnostic;
use crate::symbol::{Symbol, SymbolTable};
use crate::types::{
    ParsedCall, ParsedClass, ParsedFile, ParsedFunction, ResolvedCall, ResolvedFile, SourceLocation,
    SymbolKind,
};
use context::ResolutionContext;
use rayon::prelude::*;
use reexport::ReexportIndex;
use stdlib::provider_for;

/// Resolves every file in `files` against `table`, in parallel, returning
/// one `ResolvedFile` per input file plus any diagnostics raised along the
/// way. `table` and `reexports` are shared read-only across workers
/// (SPEC_FULL.md §5 "Resolve phase").
pub fn resolve_all(files: &[ParsedFile], table: &SymbolTable) -> (Vec<ResolvedFile>, Vec<Diagnostic>) {
    let reexports = ReexportIndex::build(files);
    let results: Vec<(ResolvedFile, Vec<Diagnostic>)> = files
        .par_iter()
        .map(|file| resolve_file(file, table, &reexports))
        .collect();

    let mut resolved = Vec::with_capacity(results.len());
    let mut diagnostics = Vec::new();
    for (file, diags) in results {
        resolved.push(file);
        diagnostics.extend(diags);
    }
    (resolved, diagnostics)
}

fn resolve_file(file: &ParsedFile, table: &SymbolTable, reexports: &ReexportIndex) -> (ResolvedFile, Vec<Diagnostic>) {
    let mut ctx = ResolutionContext::for_file(file, table, Some(reexports));
    let mut resolved_calls = Vec::new();
    let mut diagnostics = Vec::new();
    let stdlib = provider_for(file.language);

    if !file.module_level_calls.is_empty() {
        let from_fqn = module_init_fqn(file);
        ctx.current_class = None;
        ctx.current_super_class = None;
        ctx.current_function = None;
        ctx.local_variables.clear();
        for property in &file.top_level_properties {
            if let Some(ty) = &property.r#type {
                ctx.local_variables.insert(property.name.clone(), ty.clone());
            }
        }
        resolve_calls(
            &file.module_level_calls,
            &from_fqn,
            &ctx,
            table,
            stdlib.as_ref(),
            &mut resolved_calls,
            &mut diagnostics,
            file,
        );
    }

    for function in &file.top_level_functions {
        let from_fqn = fqn_for_location(table, &file.file_path, &function.location)
            .unwrap_or_else(|| function.name.clone());
        ctx.current_class = None;
        ctx.current_super_class = None;
        ctx.enter_function(function);
        resolve_calls(&function.calls, &from_fqn, &ctx, table, stdlib.as_ref(), &mut resolved_calls, &mut diagnostics, file);
    }

    for class in &file.classes {
        resolve_class(class, &mut ctx, table, stdlib.as_ref(), file, &mut resolved_calls, &mut diagnostics);
    }

    let resolved_file = ResolvedFile {
        file: file.clone(),
        resolved_calls,
    };
    (resolved_file, diagnostics)
}

fn resolve_class(
    class: &ParsedClass,
    ctx: &mut ResolutionContext,
    table: &SymbolTable,
    stdlib: &dyn stdlib::StdlibProvider,
    file: &ParsedFile,
    resolved_calls: &mut Vec<ResolvedCall>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    ctx.enter_class(class);
    for function in &class.functions {
        let from_fqn = fqn_for_location(table, &file.file_path, &function.location)
            .unwrap_or_else(|| function.name.clone());
        ctx.enter_function(function);
        resolve_calls(&function.calls, &from_fqn, ctx, table, stdlib, resolved_calls, diagnostics, file);
    }
    for nested in &class.nested_classes {
        resolve_class(nested, ctx, table, stdlib, file, resolved_calls, diagnostics);
    }
    if let Some(companion) = &class.companion_object {
        resolve_class(companion, ctx, table, stdlib, file, resolved_calls, diagnostics);
    }
    ctx.current_class = Some(class.name.clone());
    ctx.current_super_class = class.super_class.clone();
}

/// FQN of the synthetic function a file's module-scope statements are
/// attributed to, so bare top-level executable code (as opposed to a
/// declared function or class member) still has a `ResolvedCall` source.
fn module_init_fqn(file: &ParsedFile) -> String {
    match file.root_prefix() {
        Some(prefix) if file.language.is_slash_separated() => format!("{prefix}/<top>"),
        Some(prefix) => format!("{prefix}.<top>"),
        None => "<top>".to_string(),
    }
}

fn fqn_for_location(table: &SymbolTable, file_path: &str, location: &SourceLocation) -> Option<String> {
    table
        .by_fqn
        .values()
        .find(|s| s.kind == SymbolKind::Function && s.file_path == file_path && s.location == *location)
        .map(|s| s.fqn.clone())
}

fn resolve_calls(
    calls: &[ParsedCall],
    from_fqn: &str,
    ctx: &ResolutionContext,
    table: &SymbolTable,
    stdlib: &dyn stdlib::StdlibProvider,
    resolved_calls: &mut Vec<ResolvedCall>,
    diagnostics: &mut Vec<Diagnostic>,
    file: &ParsedFile,
) {
    for call in calls {
        match classify_call(call, ctx, table, stdlib) {
            Some(to_fqn) => resolved_calls.push(ResolvedCall {
                from_fqn: from_fqn.to_string(),
                to_fqn,
                location: call.location.clone(),
            }),
            None => diagnostics.push(Diagnostic::UnresolvedReference {
                path: file.file_path.clone(),
                name: call.name.clone(),
                location: call.location.clone(),
            }),
        }
    }
}

/// Call classification, in order, stopping at the first match
/// (SPEC_FULL.md §4.5).
fn classify_call(
    call: &ParsedCall,
    ctx: &ResolutionContext,
    table: &SymbolTable,
    stdlib: &dyn stdlib::StdlibProvider,
) -> Option<String> {
    // (1) qualified call on a known FQN/type, including `.Companion` and
    // `SomePackage.SomeType` static paths.
    if call.receiver.is_some() {
        if let Some(fqn) = qualified_candidate(call, ctx, table) {
            return Some(fqn);
        }
    }

    // (2) enum synthetic members.
    if matches!(call.name.as_str(), "valueOf" | "values" | "entries") {
        if let Some(receiver) = &call.receiver {
            if let Some(type_fqn) = ctx.resolve_simple_name(table, receiver) {
                if matches!(table.lookup_fqn(&type_fqn).map(|s| s.kind), Some(SymbolKind::Enum)) {
                    return Some(format!("{type_fqn}.{}", call.name));
                }
            }
        }
    }

    // (3) constructor heuristic on an upper-case bare name.
    if call.is_constructor_call || call.receiver.is_none() && call.name.chars().next().map(char::is_uppercase).unwrap_or(false) {
        if let Some(type_fqn) = ctx.resolve_simple_name(table, &call.name) {
            return Some(format!("{type_fqn}.<init>"));
        }
    }

    // (4) method on a typed local/property receiver.
    if let Some(receiver) = &call.receiver {
        if let Some(declared_type) = ctx.local_variables.get(receiver) {
            if let Some(fqn) = resolve_on_type(declared_type, call, table) {
                return Some(fqn);
            }
        }
    }

    // (5) this/super against currentClass / its superClass.
    if let Some(receiver) = &call.receiver {
        if receiver == "this" {
            if let Some(fqn) = resolve_member_in_class(ctx, table, ctx.current_class.as_deref(), &call.name) {
                return Some(fqn);
            }
        }
        if receiver == "super" {
            if let Some(fqn) = resolve_member_in_class(ctx, table, ctx.current_super_class.as_deref(), &call.name) {
                return Some(fqn);
            }
        }
    }

    // (6) extension function lookup by receiver type, or last-resort by name alone.
    if let Some(receiver) = &call.receiver {
        let declared_type = ctx.local_variables.get(receiver).map(String::as_str);
        for candidate in table.lookup_functions(&call.name) {
            if let Some(func) = candidate.as_function() {
                if func.is_extension {
                    if let (Some(dt), Some(receiver_type)) = (declared_type, &func.receiver_type) {
                        if base_type(dt) == base_type(receiver_type) {
                            return Some(candidate.fqn.clone());
                        }
                    }
                }
            }
        }
        for candidate in table.lookup_functions(&call.name) {
            if candidate.as_function().map(|f| f.is_extension).unwrap_or(false) {
                return Some(candidate.fqn.clone());
            }
        }
    }

    // (7) top-level function by name.
    if call.receiver.is_none() {
        if let Some(fqn) = top_level_candidate(call, ctx, table) {
            return Some(fqn);
        }
    }

    stdlib.resolve(&call.name)
}

/// Gathers every same-name function symbol matching `scope` and lets
/// `overload::pick_overload` choose among them by the call's argument types
/// (SPEC_FULL.md §4.5 steps 1/4: "select by overload scoring").
fn pick_overload_fqn(table: &SymbolTable, name: &str, call: &ParsedCall, scope: impl Fn(&Symbol) -> bool) -> Option<String> {
    let candidates: Vec<&Symbol> = table.lookup_functions(name).iter().filter(|s| scope(*s)).collect();
    if candidates.is_empty() {
        return None;
    }
    overload::pick_overload(&candidates, call.argument_types.as_deref(), call.argument_count).map(|s| s.fqn.clone())
}

fn qualified_candidate(call: &ParsedCall, ctx: &ResolutionContext, table: &SymbolTable) -> Option<String> {
    let receiver = call.receiver.as_deref()?;
    if let Some(base_fqn) = ctx.resolve_simple_name(table, receiver) {
        if let Some(fqn) = pick_overload_fqn(table, &call.name, call, |s| {
            s.as_function().and_then(|f| f.declaring_type_fqn.as_deref()) == Some(base_fqn.as_str())
        }) {
            return Some(fqn);
        }
        let candidate = format!("{base_fqn}.{}", call.name);
        if table.lookup_fqn(&candidate).is_some() {
            return Some(candidate);
        }
    }
    let direct = format!("{receiver}.{}", call.name);
    if table.lookup_fqn(&direct).is_some() {
        return Some(direct);
    }
    None
}

/// Top-level (no-receiver) name resolution with overload scoring layered on
/// top: `resolve_simple_name` finds which package/import scope the name
/// lives in, then every package-level overload sharing that scope is scored
/// against the call's arguments rather than always returning whichever
/// overload happens to own the bare FQN (SPEC_FULL.md §4.5 scenario E6).
fn top_level_candidate(call: &ParsedCall, ctx: &ResolutionContext, table: &SymbolTable) -> Option<String> {
    let fqn = ctx.resolve_simple_name(table, &call.name)?;
    let Some(sym) = table.lookup_fqn(&fqn) else {
        return Some(fqn);
    };
    if let Some(func) = sym.as_function() {
        if func.declaring_type_fqn.is_none() {
            if let Some(package) = &func.package_name {
                if let Some(scored) = pick_overload_fqn(table, &call.name, call, |s| {
                    s.as_function()
                        .map(|f| f.declaring_type_fqn.is_none() && f.package_name.as_deref() == Some(package.as_str()))
                        .unwrap_or(false)
                }) {
                    return Some(scored);
                }
            }
        }
    }
    Some(fqn)
}

/// Strips generic type arguments (`List<Int>` -> `List`) and nullability
/// markers for base-type comparison.
fn base_type(type_text: &str) -> &str {
    let trimmed = type_text.trim().trim_end_matches('?');
    trimmed.split('<').next().unwrap_or(trimmed).trim()
}

/// Looks up `call.name` on `declared_type`, trying the exact type first and
/// then ascending `superClass`/`interfaces` transitively (SPEC_FULL.md §4.5
/// step 4), scoring overloads declared at each level against the call's
/// arguments before moving up. A visited-fqn set keeps diamond/cyclic
/// hierarchies terminating.
fn resolve_on_type(declared_type: &str, call: &ParsedCall, table: &SymbolTable) -> Option<String> {
    let base = base_type(declared_type);
    let seed = table
        .lookup_name(base)
        .iter()
        .find(|s| matches!(s.kind, SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum))?
        .fqn
        .clone();

    let mut visited = std::collections::HashSet::new();
    let mut queue = std::collections::VecDeque::from([seed]);

    while let Some(current_fqn) = queue.pop_front() {
        if !visited.insert(current_fqn.clone()) {
            continue;
        }
        if let Some(fqn) = pick_overload_fqn(table, &call.name, call, |s| {
            s.as_function().and_then(|f| f.declaring_type_fqn.as_deref()) == Some(current_fqn.as_str())
        }) {
            return Some(fqn);
        }
        if let Some((super_name, interfaces)) = table.class_hierarchy.get(&current_fqn) {
            for name in super_name.iter().chain(interfaces.iter()) {
                if let Some(sym) = table
                    .lookup_name(name)
                    .iter()
                    .find(|s| matches!(s.kind, SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum))
                {
                    queue.push_back(sym.fqn.clone());
                }
            }
        }
    }
    None
}

fn resolve_member_in_class(ctx: &ResolutionContext, table: &SymbolTable, class_name: Option<&str>, member_name: &str) -> Option<String> {
    let class_name = class_name?;
    let package = ctx.package_name.or(ctx.root_prefix).unwrap_or("");
    let class_fqn = if package.is_empty() {
        class_name.to_string()
    } else {
        format!("{package}.{class_name}")
    };
    let member_fqn = format!("{class_fqn}.{member_name}");
    table.lookup_fqn(&member_fqn).map(|_| member_fqn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::build_symbol_table;
    use crate::types::{ClassKind, Language, ParsedParameter, SourceLocation};

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1, 1, 1)
    }

    #[test]
    fn top_level_call_resolves_within_same_package() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut caller = ParsedFunction::new("run", loc());
        caller.calls.push(ParsedCall::new("doThing", loc()));
        file.top_level_functions.push(caller);
        file.top_level_functions.push(ParsedFunction::new("doThing", loc()));

        let (table, _) = build_symbol_table(&[file.clone()]);
        let (resolved, diagnostics) = resolve_all(&[file], &table);
        assert!(diagnostics.iter().all(|d| !matches!(d, Diagnostic::UnresolvedReference { .. })) || !resolved[0].resolved_calls.is_empty());
        assert_eq!(resolved[0].resolved_calls.len(), 1);
        assert_eq!(resolved[0].resolved_calls[0].to_fqn, "com.acme.doThing");
    }

    #[test]
    fn constructor_call_resolves_to_init_fqn() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut caller = ParsedFunction::new("run", loc());
        let mut call = ParsedCall::new("Widget", loc());
        call.is_constructor_call = true;
        caller.calls.push(call);
        file.top_level_functions.push(caller);
        file.classes.push(ParsedClass::new("Widget", ClassKind::Class, loc()));

        let (table, _) = build_symbol_table(&[file.clone()]);
        let (resolved, _) = resolve_all(&[file], &table);
        assert_eq!(resolved[0].resolved_calls[0].to_fqn, "com.acme.Widget.<init>");
    }

    #[test]
    fn unresolvable_call_is_dropped_not_errored() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut caller = ParsedFunction::new("run", loc());
        caller.calls.push(ParsedCall::new("totallyUnknownThing", loc()));
        file.top_level_functions.push(caller);

        let (table, _) = build_symbol_table(&[file.clone()]);
        let (resolved, diagnostics) = resolve_all(&[file], &table);
        assert!(resolved[0].resolved_calls.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::UnresolvedReference { .. }));
    }

    #[test]
    fn method_call_on_typed_local_resolves_through_declared_type() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut caller = ParsedFunction::new("run", loc());
        caller.parameters.push(ParsedParameter {
            name: "widget".to_string(),
            r#type: Some("Widget".to_string()),
            default_value: None,
            annotations: vec![],
        });
        let mut call = ParsedCall::new("render", loc());
        call.receiver = Some("widget".to_string());
        caller.calls.push(call);
        file.top_level_functions.push(caller);

        let mut widget = ParsedClass::new("Widget", ClassKind::Class, loc());
        widget.functions.push(ParsedFunction::new("render", loc()));
        file.classes.push(widget);

        let (table, _) = build_symbol_table(&[file.clone()]);
        let (resolved, _) = resolve_all(&[file], &table);
        assert_eq!(resolved[0].resolved_calls[0].to_fqn, "com.acme.Widget.render");
    }

    #[test]
    fn method_call_ascends_superclass_when_not_declared_directly() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut caller = ParsedFunction::new("run", loc());
        caller.parameters.push(ParsedParameter {
            name: "widget".to_string(),
            r#type: Some("Widget".to_string()),
            default_value: None,
            annotations: vec![],
        });
        let mut call = ParsedCall::new("render", loc());
        call.receiver = Some("widget".to_string());
        caller.calls.push(call);
        file.top_level_functions.push(caller);

        let mut base = ParsedClass::new("BaseWidget", ClassKind::Class, loc());
        base.functions.push(ParsedFunction::new("render", loc()));
        file.classes.push(base);

        let mut widget = ParsedClass::new("Widget", ClassKind::Class, loc());
        widget.super_class = Some("BaseWidget".to_string());
        file.classes.push(widget);

        let (table, _) = build_symbol_table(&[file.clone()]);
        let (resolved, _) = resolve_all(&[file], &table);
        assert_eq!(resolved[0].resolved_calls[0].to_fqn, "com.acme.BaseWidget.render");
    }

    #[test]
    fn method_call_overload_picks_by_argument_type_not_declaration_order() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut caller = ParsedFunction::new("run", loc());
        caller.parameters.push(ParsedParameter {
            name: "widget".to_string(),
            r#type: Some("Widget".to_string()),
            default_value: None,
            annotations: vec![],
        });
        let mut call = ParsedCall::new("render", loc());
        call.receiver = Some("widget".to_string());
        call.argument_types = Some(vec!["Int".to_string()]);
        call.argument_count = 1;
        caller.calls.push(call);
        file.top_level_functions.push(caller);

        let mut widget = ParsedClass::new("Widget", ClassKind::Class, loc());
        let mut string_overload = ParsedFunction::new("render", loc());
        string_overload.parameters.push(ParsedParameter {
            name: "x".to_string(),
            r#type: Some("String".to_string()),
            default_value: None,
            annotations: vec![],
        });
        widget.functions.push(string_overload);
        let mut int_overload = ParsedFunction::new("render", loc());
        int_overload.parameters.push(ParsedParameter {
            name: "x".to_string(),
            r#type: Some("Int".to_string()),
            default_value: None,
            annotations: vec![],
        });
        widget.functions.push(int_overload);
        file.classes.push(widget);

        let (table, _) = build_symbol_table(&[file.clone()]);
        assert!(table.lookup_fqn("com.acme.Widget.render").is_some());
        assert!(table.lookup_fqn("com.acme.Widget.render#2").is_some());

        let (resolved, _) = resolve_all(&[file], &table);
        assert_eq!(resolved[0].resolved_calls[0].to_fqn, "com.acme.Widget.render#2");
    }
}
