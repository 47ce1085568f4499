//! Conversão de argumentos em material de chave.

use crate::types::errors::{MemoizeError, MemoizeResult};

use super::builder::{CacheKey, KeyBuilder};

/// Trait para valores que podem participar de uma chave de cache.
///
/// A escrita deve ser determinística: o mesmo valor escreve sempre os mesmos
/// bytes. Valores sem igualdade bem definida (floats não-finitos) falham com
/// [`MemoizeError::UnhashableArgument`].
pub trait KeySource {
    /// Escreve este valor no construtor de chaves.
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()>;
}

/// Deriva a chave de uma sequência de argumentos.
pub fn key_of<A: KeySource + ?Sized>(args: &A) -> MemoizeResult<CacheKey> {
    let mut builder = KeyBuilder::new();
    args.write_key(&mut builder)?;
    Ok(builder.finish())
}

/// Deriva a chave de uma sequência de argumentos dentro de um namespace.
pub fn key_of_with_namespace<A: KeySource + ?Sized>(
    namespace: &str,
    args: &A,
) -> MemoizeResult<CacheKey> {
    let mut builder = KeyBuilder::with_namespace(namespace);
    args.write_key(&mut builder)?;
    Ok(builder.finish())
}

impl KeySource for () {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        builder.write_unit();
        Ok(())
    }
}

impl KeySource for bool {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        builder.write_bool(*self);
        Ok(())
    }
}

impl KeySource for char {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        builder.write_char(*self);
        Ok(())
    }
}

macro_rules! impl_key_source_uint {
    ($($ty:ty),+) => {
        $(impl KeySource for $ty {
            fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
                builder.write_uint(*self as u128);
                Ok(())
            }
        })+
    };
}

macro_rules! impl_key_source_int {
    ($($ty:ty),+) => {
        $(impl KeySource for $ty {
            fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
                builder.write_int(*self as i128);
                Ok(())
            }
        })+
    };
}

impl_key_source_uint!(u8, u16, u32, u64, u128, usize);
impl_key_source_int!(i8, i16, i32, i64, i128, isize);

fn write_finite_float(value: f64, builder: &mut KeyBuilder) -> MemoizeResult<()> {
    if !value.is_finite() {
        return Err(MemoizeError::unhashable(format!(
            "float não-finito ({}) não tem igualdade estável",
            value
        )));
    }
    builder.write_float(value);
    Ok(())
}

impl KeySource for f32 {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        write_finite_float(f64::from(*self), builder)
    }
}

impl KeySource for f64 {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        write_finite_float(*self, builder)
    }
}

impl KeySource for str {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        builder.write_str(self);
        Ok(())
    }
}

impl KeySource for String {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        builder.write_str(self);
        Ok(())
    }
}

impl<T: KeySource + ?Sized> KeySource for &T {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        (**self).write_key(builder)
    }
}

impl<T: KeySource> KeySource for Option<T> {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        match self {
            Some(inner) => {
                builder.write_some();
                inner.write_key(builder)
            }
            None => {
                builder.write_none();
                Ok(())
            }
        }
    }
}

impl<T: KeySource> KeySource for [T] {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        builder.write_seq_len(self.len());
        for item in self {
            item.write_key(builder)?;
        }
        Ok(())
    }
}

impl<T: KeySource> KeySource for Vec<T> {
    fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
        self.as_slice().write_key(builder)
    }
}

macro_rules! impl_key_source_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: KeySource),+> KeySource for ($($name,)+) {
            fn write_key(&self, builder: &mut KeyBuilder) -> MemoizeResult<()> {
                $(self.$idx.write_key(builder)?;)+
                Ok(())
            }
        }
    };
}

impl_key_source_tuple!(A: 0);
impl_key_source_tuple!(A: 0, B: 1);
impl_key_source_tuple!(A: 0, B: 1, C: 2);
impl_key_source_tuple!(A: 0, B: 1, C: 2, D: 3);
