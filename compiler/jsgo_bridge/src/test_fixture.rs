//! A descriptor table with a handful of program types, shared by the unit
//! tests.

use crate::{
    Bridge, DescId, Descriptor, DescriptorTable, FuncSig, Kind, MethodSig, StructField, Value,
};

pub(crate) struct Fixture {
    pub bridge: Bridge,
    /// `struct { X int; Y float64; name string }`
    pub point: DescId,
    pub point_ptr: DescId,
    /// `struct { Value int; Next *Node }`
    pub node: DescId,
    pub node_ptr: DescId,
    /// `struct { *js.Object; Label string }`
    pub holder: DescId,
    pub holder_ptr: DescId,
    /// `struct { Holder; Extra int }`: a handle two first fields deep.
    pub outer: DescId,
    pub map_string_int: DescId,
    pub array_u8_3: DescId,
    pub slice_string: DescId,
    pub slice_point_ptr: DescId,
    pub int_ptr: DescId,
    /// `func(int) int`
    pub func_int_int: DescId,
    /// `func(string, ...int) int`
    pub func_variadic: DescId,
    /// `func() (int, string)`
    pub func_pair: DescId,
    /// `interface { String() string }`
    pub stringer: DescId,
    /// Named struct with a `String() string` method.
    pub label: DescId,
    pub chan_int: DescId,
    pub timestamp: DescId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut table = DescriptorTable::new();

        let point = table.add(
            Descriptor::new(
                Kind::Struct {
                    fields: vec![
                        StructField::new("X", DescId::INT),
                        StructField::new("Y", DescId::FLOAT64),
                        StructField::new("name", DescId::STRING),
                    ],
                },
                "main.Point",
            )
            .named(),
        );
        let point_ptr = table.add(Descriptor::new(Kind::Ptr { elem: point }, "*main.Point"));

        let node = table.reserve();
        let node_ptr = table.add(Descriptor::new(Kind::Ptr { elem: node }, "*main.Node"));
        table.define(
            node,
            Descriptor::new(
                Kind::Struct {
                    fields: vec![
                        StructField::new("Value", DescId::INT),
                        StructField::new("Next", node_ptr),
                    ],
                },
                "main.Node",
            )
            .named(),
        );

        let holder = table.add(
            Descriptor::new(
                Kind::Struct {
                    fields: vec![
                        StructField::new("Object", DescId::JS_OBJECT).embedded(),
                        StructField::new("Label", DescId::STRING),
                    ],
                },
                "main.Holder",
            )
            .named(),
        );
        let holder_ptr = table.add(Descriptor::new(Kind::Ptr { elem: holder }, "*main.Holder"));
        let outer = table.add(
            Descriptor::new(
                Kind::Struct {
                    fields: vec![
                        StructField::new("Holder", holder).embedded(),
                        StructField::new("Extra", DescId::INT),
                    ],
                },
                "main.Outer",
            )
            .named(),
        );

        let map_string_int = table.add(Descriptor::new(
            Kind::Map {
                key: DescId::STRING,
                elem: DescId::INT,
            },
            "map[string]int",
        ));
        let array_u8_3 = table.add(Descriptor::new(
            Kind::Array {
                elem: DescId::UINT8,
                len: 3,
            },
            "[3]uint8",
        ));
        let slice_string = table.add(Descriptor::new(
            Kind::Slice {
                elem: DescId::STRING,
            },
            "[]string",
        ));
        let slice_point_ptr = table.add(Descriptor::new(
            Kind::Slice { elem: point_ptr },
            "[]*main.Point",
        ));
        let int_ptr = table.add(Descriptor::new(Kind::Ptr { elem: DescId::INT }, "*int"));

        let func_int_int = table.add(Descriptor::new(
            Kind::Func(FuncSig {
                params: vec![DescId::INT],
                results: vec![DescId::INT],
                variadic: false,
            }),
            "func(int) int",
        ));
        let func_variadic = table.add(Descriptor::new(
            Kind::Func(FuncSig {
                params: vec![DescId::STRING, DescId::SLICE_INT],
                results: vec![DescId::INT],
                variadic: true,
            }),
            "func(string, ...int) int",
        ));
        let func_pair = table.add(Descriptor::new(
            Kind::Func(FuncSig {
                params: Vec::new(),
                results: vec![DescId::INT, DescId::STRING],
                variadic: false,
            }),
            "func() (int, string)",
        ));
        let string_sig = table.add(Descriptor::new(
            Kind::Func(FuncSig {
                params: Vec::new(),
                results: vec![DescId::STRING],
                variadic: false,
            }),
            "func() string",
        ));
        let stringer = table.add(Descriptor::new(
            Kind::Interface {
                methods: vec![MethodSig::new("String", string_sig)],
            },
            "fmt.Stringer",
        ));
        let label = table.add(
            Descriptor::new(
                Kind::Struct {
                    fields: vec![StructField::new("Text", DescId::STRING)],
                },
                "main.Label",
            )
            .named()
            .with_methods(vec![MethodSig::new("String", string_sig)]),
        );
        let chan_int = table.add(Descriptor::new(
            Kind::Chan {
                elem: DescId::INT,
            },
            "chan int",
        ));
        let timestamp = table.register_timestamp();

        Fixture {
            bridge: Bridge::new(table),
            point,
            point_ptr,
            node,
            node_ptr,
            holder,
            holder_ptr,
            outer,
            map_string_int,
            array_u8_3,
            slice_string,
            slice_point_ptr,
            int_ptr,
            func_int_int,
            func_variadic,
            func_pair,
            stringer,
            label,
            chan_int,
            timestamp,
        }
    }

    /// A fixture whose table has no timestamp mapping.
    pub fn without_timestamp() -> Bridge {
        Bridge::new(DescriptorTable::new())
    }

    pub fn point(&self, x: i64, y: f64, name: &str) -> Value {
        Value::new_struct(
            self.point,
            vec![Value::int(x), Value::float(y), Value::string(name)],
        )
    }
}
