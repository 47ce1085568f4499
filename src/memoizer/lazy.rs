//! Valor memoizado a partir de um supplier.
//!
//! Complementa o motor keyado: memoiza o retorno de uma computação de zero
//! argumentos, avaliada no máximo uma vez a menos que reavaliação seja
//! pedida explicitamente.

enum Inner<T> {
    /// Ainda depende do supplier; `value` guarda o resultado memoizado.
    Lazy {
        supplier: Box<dyn FnMut() -> T + Send>,
        value: Option<T>,
    },

    /// Construído já com um valor; não há supplier para reavaliar.
    Fixed(T),
}

/// Valor memoizado de uma computação sem argumentos.
///
/// O supplier só roda quando [`memoized`](Self::memoized) é chamado sem um
/// valor já memoizado, ou quando [`evaluate`](Self::evaluate) força a
/// reavaliação.
pub struct MemoizedValue<T> {
    inner: Inner<T>,
}

impl<T> MemoizedValue<T> {
    /// Cria um valor memoizado a partir de um supplier.
    pub fn new(supplier: impl FnMut() -> T + Send + 'static) -> Self {
        Self {
            inner: Inner::Lazy {
                supplier: Box::new(supplier),
                value: None,
            },
        }
    }

    /// Cria um valor já memoizado; o supplier nunca roda.
    pub fn from_value(value: T) -> Self {
        Self {
            inner: Inner::Fixed(value),
        }
    }

    /// Executa o supplier e re-memoiza o resultado.
    ///
    /// Diferente de [`memoized`](Self::memoized), sempre reavalia quando há
    /// um supplier. Valores construídos com
    /// [`from_value`](Self::from_value) retornam o valor fixo.
    pub fn evaluate(&mut self) -> &T {
        match &mut self.inner {
            Inner::Lazy { supplier, value } => value.insert(supplier()),
            Inner::Fixed(value) => value,
        }
    }

    /// Retorna o valor memoizado, avaliando o supplier se ainda não houver.
    pub fn memoized(&mut self) -> &T {
        match &mut self.inner {
            Inner::Lazy { supplier, value } => value.get_or_insert_with(|| supplier()),
            Inner::Fixed(value) => value,
        }
    }

    /// Avalia ansiosamente, garantindo que exista um valor memoizado.
    pub fn eager(mut self) -> Self {
        self.evaluate();
        self
    }

    /// Se há um valor memoizado no momento.
    pub fn has_memoized(&self) -> bool {
        match &self.inner {
            Inner::Lazy { value, .. } => value.is_some(),
            Inner::Fixed(_) => true,
        }
    }

    /// Espia o valor memoizado sem avaliar.
    pub fn peek(&self) -> Option<&T> {
        match &self.inner {
            Inner::Lazy { value, .. } => value.as_ref(),
            Inner::Fixed(value) => Some(value),
        }
    }

    /// Consome o wrapper e devolve o valor memoizado, se houver.
    pub fn take(self) -> Option<T> {
        match self.inner {
            Inner::Lazy { value, .. } => value,
            Inner::Fixed(value) => Some(value),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MemoizedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizedValue")
            .field("has_memoized", &self.has_memoized())
            .field("value", &self.peek())
            .finish()
    }
}
