//! Predefined atoms (engine-interned identifiers)
//!
//! Ids are read from the engine binding's own `JS_ATOM_*` constants. The
//! snapshot below only supplies the order, the symbolic name and the literal
//! text; the compile-time check at the bottom of the table rejects a snapshot
//! that is missing atoms or lists them out of engine order.

use rquickjs_sys as sys;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::snapshot::TableEntry;

/// One predefined atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AtomDef {
    /// Engine atom id
    pub id: u32,
    /// Symbolic name (`Symbol_iterator`, `empty_string`, ...)
    pub name: &'static str,
    /// Literal text the atom interns (`Symbol.iterator`, `""`, ...)
    pub text: &'static str,
}

/// Extra names for atoms whose literal text is empty or shadowed by an
/// earlier atom.
const ALIASES: &[(u32, &str)] = &[
    (sys::JS_ATOM_empty_string as u32, "empty_string"),
    (sys::JS_ATOM_Private_brand as u32, "<private_brand>"),
];

macro_rules! atom_table {
    ($($name:tt => $text:literal,)*) => {
        paste::paste! {
            const ATOMS: &[AtomDef] = &[
                $(AtomDef {
                    id: sys::[<JS_ATOM_ $name>] as u32,
                    name: stringify!($name),
                    text: $text,
                },)*
            ];
        }
    };
}

atom_table! {
    null => "null",
    false => "false",
    true => "true",
    if => "if",
    else => "else",
    return => "return",
    var => "var",
    this => "this",
    delete => "delete",
    void => "void",
    typeof => "typeof",
    new => "new",
    in => "in",
    instanceof => "instanceof",
    do => "do",
    while => "while",
    for => "for",
    break => "break",
    continue => "continue",
    switch => "switch",
    case => "case",
    default => "default",
    throw => "throw",
    try => "try",
    catch => "catch",
    finally => "finally",
    function => "function",
    debugger => "debugger",
    with => "with",
    class => "class",
    const => "const",
    enum => "enum",
    export => "export",
    extends => "extends",
    import => "import",
    super => "super",
    implements => "implements",
    interface => "interface",
    let => "let",
    package => "package",
    private => "private",
    protected => "protected",
    public => "public",
    static => "static",
    yield => "yield",
    await => "await",
    empty_string => "",
    keys => "keys",
    size => "size",
    length => "length",
    message => "message",
    cause => "cause",
    errors => "errors",
    stack => "stack",
    name => "name",
    toString => "toString",
    toLocaleString => "toLocaleString",
    valueOf => "valueOf",
    eval => "eval",
    prototype => "prototype",
    constructor => "constructor",
    configurable => "configurable",
    writable => "writable",
    enumerable => "enumerable",
    value => "value",
    get => "get",
    set => "set",
    of => "of",
    __proto__ => "__proto__",
    undefined => "undefined",
    number => "number",
    boolean => "boolean",
    string => "string",
    object => "object",
    symbol => "symbol",
    integer => "integer",
    unknown => "unknown",
    arguments => "arguments",
    callee => "callee",
    caller => "caller",
    _eval_ => "<eval>",
    _ret_ => "<ret>",
    _var_ => "<var>",
    _arg_var_ => "<arg_var>",
    _with_ => "<with>",
    lastIndex => "lastIndex",
    target => "target",
    index => "index",
    input => "input",
    defineProperties => "defineProperties",
    apply => "apply",
    join => "join",
    concat => "concat",
    split => "split",
    construct => "construct",
    getPrototypeOf => "getPrototypeOf",
    setPrototypeOf => "setPrototypeOf",
    isExtensible => "isExtensible",
    preventExtensions => "preventExtensions",
    has => "has",
    deleteProperty => "deleteProperty",
    defineProperty => "defineProperty",
    getOwnPropertyDescriptor => "getOwnPropertyDescriptor",
    ownKeys => "ownKeys",
    add => "add",
    done => "done",
    next => "next",
    values => "values",
    source => "source",
    flags => "flags",
    global => "global",
    unicode => "unicode",
    raw => "raw",
    new_target => "new.target",
    this_active_func => "this.active_func",
    home_object => "<home_object>",
    computed_field => "<computed_field>",
    static_computed_field => "<static_computed_field>",
    class_fields_init => "<class_fields_init>",
    brand => "<brand>",
    hash_constructor => "#constructor",
    as => "as",
    from => "from",
    fromAsync => "fromAsync",
    meta => "meta",
    _default_ => "*default*",
    _star_ => "*",
    Module => "Module",
    then => "then",
    resolve => "resolve",
    reject => "reject",
    promise => "promise",
    proxy => "proxy",
    revoke => "revoke",
    async => "async",
    exec => "exec",
    groups => "groups",
    indices => "indices",
    status => "status",
    reason => "reason",
    globalThis => "globalThis",
    bigint => "bigint",
    not_equal => "not-equal",
    timed_out => "timed-out",
    ok => "ok",
    toJSON => "toJSON",
    maxByteLength => "maxByteLength",
    Object => "Object",
    Array => "Array",
    Error => "Error",
    Number => "Number",
    String => "String",
    Boolean => "Boolean",
    Symbol => "Symbol",
    Arguments => "Arguments",
    Math => "Math",
    JSON => "JSON",
    Date => "Date",
    Function => "Function",
    GeneratorFunction => "GeneratorFunction",
    ForInIterator => "ForInIterator",
    RegExp => "RegExp",
    ArrayBuffer => "ArrayBuffer",
    SharedArrayBuffer => "SharedArrayBuffer",
    Uint8ClampedArray => "Uint8ClampedArray",
    Int8Array => "Int8Array",
    Uint8Array => "Uint8Array",
    Int16Array => "Int16Array",
    Uint16Array => "Uint16Array",
    Int32Array => "Int32Array",
    Uint32Array => "Uint32Array",
    BigInt64Array => "BigInt64Array",
    BigUint64Array => "BigUint64Array",
    Float16Array => "Float16Array",
    Float32Array => "Float32Array",
    Float64Array => "Float64Array",
    DataView => "DataView",
    BigInt => "BigInt",
    WeakRef => "WeakRef",
    FinalizationRegistry => "FinalizationRegistry",
    Map => "Map",
    Set => "Set",
    WeakMap => "WeakMap",
    WeakSet => "WeakSet",
    Iterator => "Iterator",
    IteratorConcat => "Iterator Concat",
    IteratorHelper => "Iterator Helper",
    IteratorWrap => "Iterator Wrap",
    Map_Iterator => "Map Iterator",
    Set_Iterator => "Set Iterator",
    Array_Iterator => "Array Iterator",
    String_Iterator => "String Iterator",
    RegExp_String_Iterator => "RegExp String Iterator",
    Generator => "Generator",
    Proxy => "Proxy",
    Promise => "Promise",
    PromiseResolveFunction => "PromiseResolveFunction",
    PromiseRejectFunction => "PromiseRejectFunction",
    AsyncFunction => "AsyncFunction",
    AsyncFunctionResolve => "AsyncFunctionResolve",
    AsyncFunctionReject => "AsyncFunctionReject",
    AsyncGeneratorFunction => "AsyncGeneratorFunction",
    AsyncGenerator => "AsyncGenerator",
    EvalError => "EvalError",
    RangeError => "RangeError",
    ReferenceError => "ReferenceError",
    SyntaxError => "SyntaxError",
    TypeError => "TypeError",
    URIError => "URIError",
    InternalError => "InternalError",
    DOMException => "DOMException",
    CallSite => "CallSite",
    Private_brand => "<brand>",
    Symbol_toPrimitive => "Symbol.toPrimitive",
    Symbol_iterator => "Symbol.iterator",
    Symbol_match => "Symbol.match",
    Symbol_matchAll => "Symbol.matchAll",
    Symbol_replace => "Symbol.replace",
    Symbol_search => "Symbol.search",
    Symbol_split => "Symbol.split",
    Symbol_toStringTag => "Symbol.toStringTag",
    Symbol_isConcatSpreadable => "Symbol.isConcatSpreadable",
    Symbol_hasInstance => "Symbol.hasInstance",
    Symbol_species => "Symbol.species",
    Symbol_unscopables => "Symbol.unscopables",
    Symbol_asyncIterator => "Symbol.asyncIterator",
}

const _: () = {
    assert!(
        ATOMS.len() == sys::JS_ATOM_END as usize - 1,
        "atom snapshot does not match the engine atom count"
    );
    let mut i = 0;
    while i < ATOMS.len() {
        assert!(ATOMS[i].id as usize == i + 1, "atom snapshot is out of engine order");
        i += 1;
    }
};

/// First id not taken by a predefined atom. Ids from here up are assigned
/// at run time, e.g. from the atom list at the head of a buffer.
pub const FIRST_ATOM_ID: u32 = sys::JS_ATOM_END as u32;

/// Function form of [`FIRST_ATOM_ID`]
pub const fn first_atom_id() -> u32 {
    FIRST_ATOM_ID
}

/// Whether `id` names one of the predefined atoms
pub const fn is_predefined_atom(id: u32) -> bool {
    id != 0 && id < FIRST_ATOM_ID
}

/// All predefined atoms in engine order (ids 1..)
pub fn atom_defs() -> &'static [AtomDef] {
    ATOMS
}

/// Symbolic name of an atom id
pub fn atom_name(id: u32) -> Option<&'static str> {
    let index = (id as usize).checked_sub(1)?;
    ATOMS.get(index).map(|atom| atom.name)
}

static ATOM_TABLE: LazyLock<Vec<TableEntry>> = LazyLock::new(build_atom_table);

/// Exported atom table: every (id, name) pair an external tool may meet.
///
/// Each atom contributes its symbolic name, then its literal text when that
/// differs and is not already taken, then the aliases. No name maps to
/// more than one id.
pub fn atom_table() -> &'static [TableEntry] {
    &ATOM_TABLE
}

fn build_atom_table() -> Vec<TableEntry> {
    let mut seen: HashSet<&'static str> = HashSet::with_capacity(ATOMS.len() * 2);
    let mut table = Vec::with_capacity(ATOMS.len() * 2 + ALIASES.len());

    let mut push = |id: u32, name: &'static str, table: &mut Vec<TableEntry>| {
        if seen.insert(name) {
            table.push(TableEntry::new(id, name));
        }
    };

    for atom in ATOMS {
        push(atom.id, atom.name, &mut table);
        push(atom.id, atom.text, &mut table);
    }
    for &(id, name) in ALIASES {
        push(id, name, &mut table);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_atoms() {
        assert_eq!(ATOMS[0].name, "null");
        assert_eq!(ATOMS[0].id, 1);
        let last = ATOMS.last().unwrap();
        assert_eq!(last.name, "Symbol_asyncIterator");
        assert_eq!(last.text, "Symbol.asyncIterator");
    }

    #[test]
    fn test_first_atom_id() {
        assert_eq!(first_atom_id(), ATOMS.len() as u32 + 1);
        assert_eq!(ATOMS.last().unwrap().id + 1, FIRST_ATOM_ID);
        assert!(is_predefined_atom(1));
        assert!(is_predefined_atom(FIRST_ATOM_ID - 1));
        assert!(!is_predefined_atom(0));
        assert!(!is_predefined_atom(FIRST_ATOM_ID));
    }

    #[test]
    fn test_atom_name_lookup() {
        assert_eq!(atom_name(sys::JS_ATOM_length as u32), Some("length"));
        assert_eq!(atom_name(0), None);
        assert_eq!(atom_name(sys::JS_ATOM_END as u32), None);
    }

    #[test]
    fn test_private_brand_alias_resolves_collision() {
        let table = atom_table();
        let brand: Vec<_> = table.iter().filter(|e| e.name == "<brand>").collect();
        assert_eq!(brand.len(), 1);
        assert_eq!(brand[0].id, sys::JS_ATOM_brand as u32);

        let private = table.iter().find(|e| e.name == "<private_brand>").unwrap();
        assert_eq!(private.id, sys::JS_ATOM_Private_brand as u32);
    }

    #[test]
    fn test_empty_string_entries() {
        let table = atom_table();
        let id = sys::JS_ATOM_empty_string as u32;
        assert!(table.iter().any(|e| e.id == id && e.name.is_empty()));
        assert!(table.iter().any(|e| e.id == id && e.name == "empty_string"));
    }

    #[test]
    fn test_keyword_atoms_have_single_entry() {
        let table = atom_table();
        assert_eq!(table.iter().filter(|e| e.name == "if").count(), 1);
    }
}
