//! Cranelift codegen for row predicates and default constructors.
//!
//! Compiles expression trees into native function pointers operating on flat
//! `*const i64` row buffers. Each column occupies one i64 slot; column
//! references resolve to fixed offsets at compilation time, so a compiled
//! function assumes its shape never changes.
//!
//! # Calling Conventions
//!
//! - Predicate: `fn(row: *const i64) -> i64` (booleans are 0 or 1).
//! - Constructor: `fn(out: *mut i64)` writing one default slot per field.
//!
//! Unlike an interpreter the emitted path is partial: expression forms with
//! no flat encoding fail compilation with `UnsupportedExpression`.

use cranelift_codegen::ir::condcodes::IntCC;
use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{AbiParam, Function, InstBuilder, MemFlags, Signature, UserFuncName};
use cranelift_codegen::isa::CallConv;
use cranelift_codegen::settings::{self, Configurable};
use cranelift_codegen::Context;
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};
use tracing::debug;

use rowforge_core::{Result, RowForgeError, Shape, Value};
use rowforge_expr::Expr;

use crate::flat::{is_flat, NONE_SENTINEL};

/// An emitted predicate. Owns the Cranelift module (code memory) and holds
/// the raw function pointer.
pub struct JitPredicate {
    _module: JITModule,
    ptr: *const u8,
}

// SAFETY: JITModule owns the code memory. ptr is valid for the module's lifetime.
unsafe impl Send for JitPredicate {}
unsafe impl Sync for JitPredicate {}

impl std::fmt::Debug for JitPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JitPredicate")
            .field("ptr", &self.ptr)
            .finish()
    }
}

impl JitPredicate {
    /// Evaluates the predicate against a flat row buffer.
    ///
    /// The buffer must be at least as wide as the shape the predicate was
    /// compiled for.
    #[inline]
    pub fn call(&self, row: &[i64]) -> i64 {
        let f: unsafe fn(*const i64) -> i64 = unsafe { std::mem::transmute(self.ptr) };
        unsafe { f(row.as_ptr()) }
    }

    /// Boolean view of [`JitPredicate::call`].
    #[inline]
    pub fn matches(&self, row: &[i64]) -> bool {
        self.call(row) != 0
    }
}

/// An emitted default constructor: construct-once semantics for a shape.
pub struct JitConstructor {
    _module: JITModule,
    ptr: *const u8,
    width: usize,
}

// SAFETY: JITModule owns the code memory. ptr is valid for the module's lifetime.
unsafe impl Send for JitConstructor {}
unsafe impl Sync for JitConstructor {}

impl std::fmt::Debug for JitConstructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JitConstructor")
            .field("ptr", &self.ptr)
            .field("width", &self.width)
            .finish()
    }
}

impl JitConstructor {
    /// Produces a fresh default-initialized flat buffer.
    pub fn invoke(&self) -> Vec<i64> {
        let mut buf = vec![0i64; self.width];
        let f: unsafe fn(*mut i64) = unsafe { std::mem::transmute(self.ptr) };
        unsafe { f(buf.as_mut_ptr()) };
        buf
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Compiles a predicate over the columns of `shape`.
///
/// Named column references resolve case-insensitively against the shape at
/// compilation time; an unknown name fails with `UnknownColumn`.
pub fn compile_predicate(expr: &Expr, shape: &Shape) -> Result<JitPredicate> {
    debug!(shape = %shape.name, "compiling row predicate");
    let mut module = make_jit_module()?;
    let ptr_type = module.target_config().pointer_type();

    let mut sig = Signature::new(CallConv::SystemV);
    sig.params.push(AbiParam::new(ptr_type));
    sig.returns.push(AbiParam::new(I64));

    let func_id = module
        .declare_function("row_predicate", Linkage::Local, &sig)
        .map_err(module_error)?;
    let mut func = Function::with_name_signature(UserFuncName::user(0, 0), sig);
    let mut func_ctx = FunctionBuilderContext::new();

    {
        let mut builder = FunctionBuilder::new(&mut func, &mut func_ctx);
        let entry = builder.create_block();
        builder.append_block_params_for_function_params(entry);
        builder.switch_to_block(entry);
        builder.seal_block(entry);

        let row_ptr = builder.block_params(entry)[0];
        let result = emit_expr(&mut builder, expr, row_ptr, shape)?;
        builder.ins().return_(&[result]);
        builder.finalize();
    }

    let ptr = define(&mut module, func_id, func)?;
    Ok(JitPredicate {
        _module: module,
        ptr,
    })
}

/// Emits, once per shape, the minimal routine "write every field's default
/// slot, return" and materializes it as an invokable function.
pub fn compile_defaults(shape: &Shape) -> Result<JitConstructor> {
    debug!(shape = %shape.name, width = shape.len(), "emitting default constructor");
    for field in &shape.fields {
        if !is_flat(field.column_type) {
            return Err(RowForgeError::UnsupportedExpression(format!(
                "column '{}' has type {:?}, which has no flat encoding",
                field.name, field.column_type
            )));
        }
    }
    let mut module = make_jit_module()?;
    let ptr_type = module.target_config().pointer_type();

    let mut sig = Signature::new(CallConv::SystemV);
    sig.params.push(AbiParam::new(ptr_type));

    let func_id = module
        .declare_function("row_defaults", Linkage::Local, &sig)
        .map_err(module_error)?;
    let mut func = Function::with_name_signature(UserFuncName::user(0, 0), sig);
    let mut func_ctx = FunctionBuilderContext::new();

    {
        let mut builder = FunctionBuilder::new(&mut func, &mut func_ctx);
        let entry = builder.create_block();
        builder.append_block_params_for_function_params(entry);
        builder.switch_to_block(entry);
        builder.seal_block(entry);

        let out_ptr = builder.block_params(entry)[0];
        let sentinel = builder.ins().iconst(I64, NONE_SENTINEL);
        let flags = MemFlags::trusted();
        for idx in 0..shape.len() {
            let offset = (idx as i32) * 8;
            builder.ins().store(flags, sentinel, out_ptr, offset);
        }
        builder.ins().return_(&[]);
        builder.finalize();
    }

    let ptr = define(&mut module, func_id, func)?;
    Ok(JitConstructor {
        _module: module,
        ptr,
        width: shape.len(),
    })
}

// ---------------------------------------------------------------------------
// Internal codegen
// ---------------------------------------------------------------------------

fn make_jit_module() -> Result<JITModule> {
    let mut flag_builder = settings::builder();
    flag_builder
        .set("use_colocated_libcalls", "false")
        .map_err(|e| RowForgeError::Internal(format!("cranelift setting: {e}")))?;
    flag_builder
        .set("is_pic", "false")
        .map_err(|e| RowForgeError::Internal(format!("cranelift setting: {e}")))?;
    let isa_builder = cranelift_native::builder()
        .map_err(|e| RowForgeError::Internal(format!("cranelift ISA builder: {e}")))?;
    let isa = isa_builder
        .finish(settings::Flags::new(flag_builder))
        .map_err(|e| RowForgeError::Internal(format!("cranelift ISA finish: {e}")))?;
    let builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
    Ok(JITModule::new(builder))
}

fn module_error(e: cranelift_module::ModuleError) -> RowForgeError {
    RowForgeError::Internal(format!("cranelift module: {e}"))
}

fn define(
    module: &mut JITModule,
    func_id: cranelift_module::FuncId,
    func: Function,
) -> Result<*const u8> {
    let mut ctx = Context::for_function(func);
    module
        .define_function(func_id, &mut ctx)
        .map_err(module_error)?;
    module.clear_context(&mut ctx);
    module
        .finalize_definitions()
        .map_err(module_error)?;
    Ok(module.get_finalized_function(func_id))
}

/// Resolves a column reference to its slot offset, checking flat-encodability.
fn column_offset(shape: &Shape, ordinal: usize) -> Result<i32> {
    let field = shape
        .fields
        .get(ordinal)
        .ok_or_else(|| RowForgeError::UnknownColumn(format!("ordinal {ordinal}")))?;
    if !is_flat(field.column_type) {
        return Err(RowForgeError::UnsupportedExpression(format!(
            "column '{}' has type {:?}, which has no flat encoding",
            field.name, field.column_type
        )));
    }
    Ok((ordinal as i32) * 8)
}

/// Emit Cranelift IR for an expression. All values are i64 internally.
/// Booleans are 0 or 1 as i64.
fn emit_expr(
    builder: &mut FunctionBuilder,
    expr: &Expr,
    row_ptr: cranelift_codegen::ir::Value,
    shape: &Shape,
) -> Result<cranelift_codegen::ir::Value> {
    use Expr::*;
    Ok(match expr {
        Literal(Value::I64(n)) => builder.ins().iconst(I64, *n),
        Literal(Value::Bool(b)) => builder.ins().iconst(I64, *b as i64),
        Literal(Value::DateTime(ms)) => builder.ins().iconst(I64, *ms),
        Literal(Value::Date(days)) => builder.ins().iconst(I64, *days as i64),
        Literal(Value::None) => builder.ins().iconst(I64, NONE_SENTINEL),
        Literal(v) => {
            return Err(RowForgeError::UnsupportedExpression(format!(
                "{} literals have no flat encoding",
                v.type_name()
            )))
        }

        Column(name) => {
            let ordinal = shape
                .field_index_ignore_case(name)
                .ok_or_else(|| RowForgeError::UnknownColumn(name.to_string()))?;
            let offset = column_offset(shape, ordinal)?;
            builder
                .ins()
                .load(I64, MemFlags::trusted(), row_ptr, offset)
        }

        Field(ordinal) => {
            let offset = column_offset(shape, *ordinal)?;
            builder
                .ins()
                .load(I64, MemFlags::trusted(), row_ptr, offset)
        }

        Eq(l, r) => icmp_op(builder, IntCC::Equal, l, r, row_ptr, shape)?,
        Ne(l, r) => icmp_op(builder, IntCC::NotEqual, l, r, row_ptr, shape)?,
        Lt(l, r) => icmp_op(builder, IntCC::SignedLessThan, l, r, row_ptr, shape)?,
        Le(l, r) => icmp_op(builder, IntCC::SignedLessThanOrEqual, l, r, row_ptr, shape)?,
        Gt(l, r) => icmp_op(builder, IntCC::SignedGreaterThan, l, r, row_ptr, shape)?,
        Ge(l, r) => icmp_op(builder, IntCC::SignedGreaterThanOrEqual, l, r, row_ptr, shape)?,

        And(l, r) => {
            let lv = emit_expr(builder, l, row_ptr, shape)?;
            let rv = emit_expr(builder, r, row_ptr, shape)?;
            builder.ins().band(lv, rv)
        }
        Or(l, r) => {
            let lv = emit_expr(builder, l, row_ptr, shape)?;
            let rv = emit_expr(builder, r, row_ptr, shape)?;
            builder.ins().bor(lv, rv)
        }
        Not(inner) => {
            let v = emit_expr(builder, inner, row_ptr, shape)?;
            let one = builder.ins().iconst(I64, 1);
            builder.ins().bxor(v, one)
        }

        Add(l, r) => {
            let lv = emit_expr(builder, l, row_ptr, shape)?;
            let rv = emit_expr(builder, r, row_ptr, shape)?;
            builder.ins().iadd(lv, rv)
        }
        Sub(l, r) => {
            let lv = emit_expr(builder, l, row_ptr, shape)?;
            let rv = emit_expr(builder, r, row_ptr, shape)?;
            builder.ins().isub(lv, rv)
        }
        Mul(l, r) => {
            let lv = emit_expr(builder, l, row_ptr, shape)?;
            let rv = emit_expr(builder, r, row_ptr, shape)?;
            builder.ins().imul(lv, rv)
        }
        Neg(inner) => {
            let v = emit_expr(builder, inner, row_ptr, shape)?;
            builder.ins().ineg(v)
        }
        Abs(inner) => {
            let v = emit_expr(builder, inner, row_ptr, shape)?;
            let neg = builder.ins().ineg(v);
            let zero = builder.ins().iconst(I64, 0);
            let is_neg = builder.ins().icmp(IntCC::SignedLessThan, v, zero);
            builder.ins().select(is_neg, neg, v)
        }

        Min(l, r) => select_op(builder, IntCC::SignedLessThan, l, r, row_ptr, shape)?,
        Max(l, r) => select_op(builder, IntCC::SignedGreaterThan, l, r, row_ptr, shape)?,

        IsNull(inner) => {
            let v = emit_expr(builder, inner, row_ptr, shape)?;
            let sentinel = builder.ins().iconst(I64, NONE_SENTINEL);
            let cmp = builder.ins().icmp(IntCC::Equal, v, sentinel);
            builder.ins().uextend(I64, cmp)
        }
        IsNotNull(inner) => {
            let v = emit_expr(builder, inner, row_ptr, shape)?;
            let sentinel = builder.ins().iconst(I64, NONE_SENTINEL);
            let cmp = builder.ins().icmp(IntCC::NotEqual, v, sentinel);
            builder.ins().uextend(I64, cmp)
        }

        If {
            cond,
            then_expr,
            else_expr,
        } => {
            let c = emit_expr(builder, cond, row_ptr, shape)?;
            let t = emit_expr(builder, then_expr, row_ptr, shape)?;
            let e = emit_expr(builder, else_expr, row_ptr, shape)?;
            let zero = builder.ins().iconst(I64, 0);
            let is_true = builder.ins().icmp(IntCC::NotEqual, c, zero);
            builder.ins().select(is_true, t, e)
        }

        // Division needs a zero check the flat path does not carry; the
        // interpreter covers these forms.
        Div(..) | Mod(..) => {
            return Err(RowForgeError::UnsupportedExpression(
                "Div and Mod are interpreter-only".to_string(),
            ))
        }
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn icmp_op(
    builder: &mut FunctionBuilder,
    cc: IntCC,
    left: &Expr,
    right: &Expr,
    row_ptr: cranelift_codegen::ir::Value,
    shape: &Shape,
) -> Result<cranelift_codegen::ir::Value> {
    let l = emit_expr(builder, left, row_ptr, shape)?;
    let r = emit_expr(builder, right, row_ptr, shape)?;
    let cmp = builder.ins().icmp(cc, l, r);
    Ok(builder.ins().uextend(I64, cmp))
}

fn select_op(
    builder: &mut FunctionBuilder,
    cc: IntCC,
    left: &Expr,
    right: &Expr,
    row_ptr: cranelift_codegen::ir::Value,
    shape: &Shape,
) -> Result<cranelift_codegen::ir::Value> {
    let l = emit_expr(builder, left, row_ptr, shape)?;
    let r = emit_expr(builder, right, row_ptr, shape)?;
    let cmp = builder.ins().icmp(cc, l, r);
    Ok(builder.ins().select(cmp, l, r))
}
